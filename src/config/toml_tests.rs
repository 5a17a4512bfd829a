//! Tests for TOML definitions parsing.

use std::path::Path;

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_single_definition() {
        let toml = r#"
            [[config]]
            title = "test_config"

            [config.settings.mysqld]
            bind-address = "0.0.0.0"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(config.config.len(), 1);

        let definition = &config.config[0];
        assert_eq!(definition.title, "test_config");
        assert!(definition.notify_service);
        assert_eq!(
            definition.settings.section("mysqld").unwrap().get("bind-address"),
            Some("0.0.0.0")
        );
    }

    #[test]
    fn parse_notify_service_false() {
        let toml = r#"
            [[config]]
            title = "quiet"
            notify_service = false
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert!(!config.config[0].notify_service);
        assert!(config.config[0].settings.is_empty());
    }

    #[test]
    fn parse_keeps_definition_and_section_order() {
        let toml = r#"
            [[config]]
            title = "second"
            [config.settings.mysqld]
            z = "1"
            a = "2"
            [config.settings.client]
            port = 3306

            [[config]]
            title = "first"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let titles: Vec<_> = config.config.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);

        let settings = &config.config[0].settings;
        let sections: Vec<_> = settings.iter().map(|(name, _)| name).collect();
        assert_eq!(sections, ["mysqld", "client"]);

        let keys: Vec<_> = settings
            .section("mysqld")
            .unwrap()
            .iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(settings.section("client").unwrap().get("port"), Some("3306"));
    }

    #[test]
    fn parse_renderer_section() {
        let toml = r#"
            [renderer]
            conf_dir = "/etc/my.cnf.d"
            base_config = "/etc/my.cnf"
            restart_exec = "mariadb-restart"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let renderer = &config.renderer;

        assert_eq!(renderer.conf_dir.as_deref(), Some(Path::new("/etc/my.cnf.d")));
        assert_eq!(renderer.base_config.as_deref(), Some(Path::new("/etc/my.cnf")));
        assert_eq!(renderer.restart_exec.as_deref(), Some("mariadb-restart"));
    }

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.config.is_empty());
        assert!(config.renderer.conf_dir.is_none());
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            [[config]]
            title = "x"
            unknown = true
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn reject_unknown_renderer_fields() {
        let toml = r#"
            [renderer]
            service = "mysql"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn reject_array_values() {
        let toml = r#"
            [[config]]
            title = "x"
            [config.settings.mysqld]
            plugins = ["a", "b"]
        "#;

        let err = TomlConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("plugins"));
    }

    #[test]
    fn reject_missing_title() {
        let toml = r#"
            [[config]]
            [config.settings.mysqld]
            a = "1"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(config.config.len(), 1);
        assert_eq!(config.config[0].title, "bind_address");
        assert!(config.config[0].notify_service);
    }

    #[test]
    fn default_template_documents_renderer_options() {
        let template = default_config_template();

        assert!(template.contains("conf_dir"));
        assert!(template.contains("base_config"));
        assert!(template.contains("restart_exec"));
        assert!(template.contains("notify_service"));
    }
}

mod loading {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[config]]
            title = "from_file"
        "#
        )
        .unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(config.config[0].title, "from_file");
    }

    #[test]
    fn load_missing_file() {
        let result = TomlConfig::load(Path::new("/nonexistent/mysql-confd.toml"));
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }
}
