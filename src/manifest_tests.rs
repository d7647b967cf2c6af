// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `manifest.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::diagnostics::SUMMARY_MARSHAL;
    use crate::registry::Registry;
    use crate::schema::validate::SUMMARY_READ_ONLY;
    use serde_json::json;

    fn pod_chaos_manifest() -> CrdManifest {
        let registry = Registry::builtin().expect("builtin CRDs");
        CrdManifest::new(
            registry
                .manifest("k8s_chaos_mesh_org_pod_chaos_v1alpha1_manifest")
                .expect("registered"),
        )
    }

    fn config() -> Value {
        json!({
            "metadata": {"name": "kill-one", "namespace": "chaos-testing", "labels": {"team": "sre"}},
            "spec": {
                "action": "pod-kill",
                "mode": "one",
                "grace_period": 0,
                "selector": {"namespaces": ["web"], "label_selectors": {"app": "web"}}
            }
        })
    }

    #[tokio::test]
    async fn test_read_renders_yaml() {
        let manifest = pod_chaos_manifest();
        let response = manifest
            .read(DataSourceReadRequest { config: config() })
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.state.expect("state");
        assert_eq!(state["id"], "chaos-testing/kill-one");

        let yaml = state["yaml"].as_str().expect("yaml string");
        let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(parsed["apiVersion"].as_str(), Some("chaos-mesh.org/v1alpha1"));
        assert_eq!(parsed["kind"].as_str(), Some("PodChaos"));
        assert_eq!(parsed["metadata"]["namespace"].as_str(), Some("chaos-testing"));
        assert_eq!(parsed["spec"]["gracePeriod"].as_i64(), Some(0));
        assert_eq!(
            parsed["spec"]["selector"]["labelSelectors"]["app"].as_str(),
            Some("web")
        );
        assert!(yaml.starts_with("apiVersion: chaos-mesh.org/v1alpha1\nkind: PodChaos\n"));
    }

    #[tokio::test]
    async fn test_read_keeps_config_in_state() {
        let response = pod_chaos_manifest()
            .read(DataSourceReadRequest { config: config() })
            .await;
        let state = response.state.expect("state");
        assert_eq!(state["spec"]["grace_period"], 0);
        assert_eq!(state["metadata"]["labels"]["team"], "sre");
    }

    #[tokio::test]
    async fn test_computed_attributes_rejected() {
        let mut config = config();
        config["yaml"] = json!("kind: Other");
        let response = pod_chaos_manifest()
            .read(DataSourceReadRequest { config })
            .await;

        assert!(response.state.is_none());
        assert_eq!(
            response.diagnostics.iter().next().map(|d| d.summary.as_str()),
            Some(SUMMARY_READ_ONLY)
        );
    }

    #[test]
    fn test_render_rejects_bad_shape() {
        let err = pod_chaos_manifest()
            .render(&json!({"metadata": "nope"}))
            .expect_err("metadata must be an object");
        assert_eq!(crate::diagnostics::Diagnostic::from_error(&err).summary, SUMMARY_MARSHAL);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(
            pod_chaos_manifest().type_name(),
            "k8s_chaos_mesh_org_pod_chaos_v1alpha1_manifest"
        );
    }
}
