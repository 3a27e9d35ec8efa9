//! `mix credo` argument lists.

use credo_config::CredoConfig;
use std::path::Path;

/// `credo info --format json --verbose`
#[must_use]
pub fn info_args() -> Vec<String> {
    ["credo", "info", "--format", "json", "--verbose"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Options shared by `suggest` and `diff`.
///
/// Tag filters are exclusive: `--checks-with-tag` wins when both lists are
/// set.
#[must_use]
pub fn config_args(config: &CredoConfig, config_file: Option<&Path>) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(file) = config_file {
        args.push("--config-file".to_string());
        args.push(file.display().to_string());
    }
    if !config.credo_configuration.is_empty() {
        args.push("--config-name".to_string());
        args.push(config.credo_configuration.clone());
    }

    let (flag, tags) = if config.checks_with_tag.is_empty() {
        ("--checks-without-tag", &config.checks_without_tag)
    } else {
        ("--checks-with-tag", &config.checks_with_tag)
    };
    for tag in tags {
        args.push(flag.to_string());
        args.push(tag.clone());
    }

    if config.strict_mode {
        args.push("--strict".to_string());
    }

    args
}

/// `credo suggest <config args> --format json --read-from-stdin`
#[must_use]
pub fn suggest_args(config: &CredoConfig, config_file: Option<&Path>) -> Vec<String> {
    let mut args = vec!["credo".to_string(), "suggest".to_string()];
    args.extend(config_args(config, config_file));
    args.extend(["--format", "json", "--read-from-stdin"].map(String::from));
    args
}

/// `credo diff <config args> --format json --read-from-stdin --from-git-merge-base <base>`
#[must_use]
pub fn diff_args(config: &CredoConfig, config_file: Option<&Path>) -> Vec<String> {
    let mut args = vec!["credo".to_string(), "diff".to_string()];
    args.extend(config_args(config, config_file));
    args.extend(["--format", "json", "--read-from-stdin", "--from-git-merge-base"].map(String::from));
    args.push(config.diff_mode.merge_base.clone());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use credo_config::DiffMode;

    #[test]
    fn test_default_suggest_args() {
        let args = suggest_args(&CredoConfig::default(), Some(Path::new(".credo.exs")));
        assert_eq!(
            args.join(" "),
            "credo suggest --config-file .credo.exs --config-name default --format json --read-from-stdin"
        );
    }

    #[test]
    fn test_suggest_args_without_config_file() {
        let args = suggest_args(&CredoConfig::default(), None);
        assert_eq!(
            args.join(" "),
            "credo suggest --config-name default --format json --read-from-stdin"
        );
    }

    #[test]
    fn test_checks_with_tag_wins() {
        let config = CredoConfig {
            checks_with_tag: vec!["a".into(), "b".into()],
            checks_without_tag: vec!["c".into()],
            strict_mode: true,
            ..CredoConfig::default()
        };
        assert_eq!(
            config_args(&config, None).join(" "),
            "--config-name default --checks-with-tag a --checks-with-tag b --strict"
        );
    }

    #[test]
    fn test_checks_without_tag() {
        let config = CredoConfig {
            checks_without_tag: vec!["controversial".into()],
            credo_configuration: String::new(),
            ..CredoConfig::default()
        };
        assert_eq!(
            config_args(&config, None).join(" "),
            "--checks-without-tag controversial"
        );
    }

    #[test]
    fn test_diff_args() {
        let config = CredoConfig {
            diff_mode: DiffMode {
                enabled: true,
                merge_base: "main".to_string(),
            },
            ..CredoConfig::default()
        };
        assert_eq!(
            diff_args(&config, None).join(" "),
            "credo diff --config-name default --format json --read-from-stdin --from-git-merge-base main"
        );
    }

    #[test]
    fn test_info_args() {
        assert_eq!(info_args().join(" "), "credo info --format json --verbose");
    }
}
