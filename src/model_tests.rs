// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `model.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::descriptor::load_crd_documents;
    use serde_json::json;

    const ENGINE_CRD: &str = r"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: chaosengines.litmuschaos.io
spec:
  group: litmuschaos.io
  names: {kind: ChaosEngine, plural: chaosengines}
  scope: Namespaced
  versions:
    - name: v1alpha1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                engineState: {type: string}
                chaosServiceAccount: {type: string}
";

    fn descriptor() -> CrdDescriptor {
        load_crd_documents("test", ENGINE_CRD)
            .expect("valid CRD")
            .remove(0)
    }

    fn plan() -> serde_json::Value {
        json!({
            "force_conflicts": true,
            "field_manager": "ci",
            "wait_for": [{"jsonpath": "$.status.engineStatus", "value": "completed"}],
            "api_version": "someone/else",
            "kind": "Imposter",
            "metadata": {"name": "nginx-chaos", "namespace": "litmus", "labels": {"team": "sre"}},
            "spec": {"engine_state": "active", "chaos_service_account": "litmus-admin"}
        })
    }

    #[test]
    fn test_parse_plan() {
        let model = ResourceModel::from_document(&descriptor(), &plan()).expect("valid plan");
        assert_eq!(model.force_conflicts, Some(true));
        assert_eq!(model.field_manager.as_deref(), Some("ci"));
        assert_eq!(
            model.wait_for,
            Some(vec![WaitCondition {
                jsonpath: "$.status.engineStatus".to_string(),
                value: "completed".to_string()
            }])
        );
        assert_eq!(model.metadata.namespace.as_deref(), Some("litmus"));
        assert_eq!(model.content.keys().collect::<Vec<_>>(), vec!["spec"]);
    }

    #[test]
    fn test_payload_overwrites_api_version_and_kind() {
        let descriptor = descriptor();
        let model = ResourceModel::from_document(&descriptor, &plan()).expect("valid plan");

        assert_eq!(
            model.payload(&descriptor),
            json!({
                "apiVersion": "litmuschaos.io/v1alpha1",
                "kind": "ChaosEngine",
                "metadata": {"name": "nginx-chaos", "namespace": "litmus", "labels": {"team": "sre"}},
                "spec": {"engineState": "active", "chaosServiceAccount": "litmus-admin"}
            })
        );
    }

    #[test]
    fn test_missing_metadata_is_marshal_error() {
        let err = ResourceModel::from_document(&descriptor(), &json!({"spec": {}}))
            .expect_err("metadata is required");
        assert!(matches!(err, ProviderError::Marshal { ref kind, .. } if kind == "ChaosEngine"));
    }

    #[test]
    fn test_refresh_from_live_object() {
        let descriptor = descriptor();
        let mut model = ResourceModel::from_document(&descriptor, &plan()).expect("valid plan");
        let live = json!({
            "apiVersion": "litmuschaos.io/v1alpha1",
            "kind": "ChaosEngine",
            "metadata": {"name": "nginx-chaos", "namespace": "litmus", "uid": "1234"},
            "spec": {"engineState": "stop", "chaosServiceAccount": "litmus-admin"},
            "status": {"engineStatus": "completed"}
        });

        model.refresh_from(&descriptor, &live);

        assert_eq!(model.id.as_deref(), Some("litmus/nginx-chaos"));
        assert_eq!(model.api_version.as_deref(), Some("litmuschaos.io/v1alpha1"));
        assert_eq!(model.kind.as_deref(), Some("ChaosEngine"));
        assert_eq!(model.content["spec"]["engine_state"], "stop");
        assert!(!model.content.contains_key("status"));
    }

    #[test]
    fn test_state_document_omits_unset_fields() {
        let descriptor = descriptor();
        let model = ResourceModel {
            metadata: Metadata {
                name: "x".to_string(),
                namespace: Some("default".to_string()),
                ..Metadata::default()
            },
            ..ResourceModel::default()
        };
        assert_eq!(
            model.to_document(&descriptor).expect("serializable"),
            json!({"metadata": {"name": "x", "namespace": "default"}})
        );
    }

    #[test]
    fn test_metadata_from_object_meta() {
        let meta = ObjectMeta {
            name: Some("engine".to_string()),
            namespace: Some("litmus".to_string()),
            labels: Some(BTreeMap::new()),
            annotations: Some(BTreeMap::from([("a".to_string(), "b".to_string())])),
            ..ObjectMeta::default()
        };

        let namespaced = Metadata::from_object_meta(&meta, true);
        assert_eq!(namespaced.namespace.as_deref(), Some("litmus"));
        assert!(namespaced.labels.is_none());
        assert_eq!(namespaced.annotations.as_ref().map(BTreeMap::len), Some(1));

        let cluster = Metadata::from_object_meta(&meta, false);
        assert!(cluster.namespace.is_none());
    }

    #[test]
    fn test_cluster_scoped_payload_drops_namespace() {
        let metadata = Metadata {
            name: "n".to_string(),
            namespace: Some("ignored".to_string()),
            ..Metadata::default()
        };
        assert_eq!(metadata.to_kubernetes(false), json!({"name": "n"}));
    }
}
