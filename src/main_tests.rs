// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crdform::constants::DEFAULT_POLL_INTERVAL_SECS;
    use std::time::Duration;

    #[test]
    fn test_timing_flags_override_config() {
        let cli = Cli::try_parse_from([
            "crdform",
            "--wait-timeout",
            "30",
            "--delete-timeout",
            "10",
            "--poll-interval",
            "5",
            "types",
        ])
        .expect("valid arguments");

        let config = provider_config(&cli.provider).expect("provider config");
        let wait = config.wait_settings();
        assert_eq!(wait.wait_timeout, Duration::from_secs(30));
        assert_eq!(wait.delete_timeout, Duration::from_secs(10));
        assert_eq!(wait.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_poll_interval_defaults_when_unset() {
        let cli = Cli::try_parse_from(["crdform", "types"]).expect("valid arguments");
        let config = provider_config(&cli.provider).expect("provider config");
        assert_eq!(config.poll_interval, None);
        assert_eq!(
            config.wait_settings().poll_interval,
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
        );
    }

    #[test]
    fn test_poll_interval_is_global() {
        let cli = Cli::try_parse_from([
            "crdform",
            "read",
            "k8s_x_v1",
            "-s",
            "s.json",
            "--poll-interval",
            "1",
        ])
        .expect("valid arguments");
        assert_eq!(cli.provider.poll_interval, Some(1));
    }
}
