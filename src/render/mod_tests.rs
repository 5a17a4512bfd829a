//! Tests for option file rendering.

use std::path::{Path, PathBuf};

use super::*;
use crate::graph::Relationship;

const DISCLAIMER: &str = "# ***   This file is managed by Puppet    ***\n\
                          # *** Automatically generated, don't edit ***\n\n";

fn bind_address() -> Settings {
    Settings::new().with_section("mysqld", [("bind-address", "0.0.0.0")])
}

mod content {
    use super::*;

    #[test]
    fn renders_single_option() {
        let rendered = ConfigRenderer::default()
            .render("test_config", &bind_address(), true)
            .unwrap();

        assert_eq!(
            rendered.content,
            "# ***   This file is managed by Puppet    ***\n\
             # *** Automatically generated, don't edit ***\n\
             \n\
             [mysqld]\n\
             bind-address = 0.0.0.0\n\
             \n"
        );
    }

    #[test]
    fn empty_settings_render_disclaimer_only() {
        let rendered = ConfigRenderer::default()
            .render("empty", &Settings::new(), true)
            .unwrap();

        assert_eq!(rendered.content, DISCLAIMER);
        assert!(!rendered.content.contains('['));
    }

    #[test]
    fn empty_section_renders_header_and_blank_line() {
        let settings = Settings::new().with_section("mysqld_safe", Vec::<(String, String)>::new());
        let content = render_content(&settings);

        assert_eq!(content, format!("{DISCLAIMER}[mysqld_safe]\n\n"));
    }

    #[test]
    fn preserves_section_and_key_order() {
        let settings = Settings::new()
            .with_section("mysqld", [("port", "3306"), ("bind-address", "0.0.0.0"), ("max_connections", "200")])
            .with_section("client", [("socket", "/run/mysqld/mysqld.sock")])
            .with_section("mysqldump", [("quick", "true"), ("max_allowed_packet", "16M")]);

        let content = render_content(&settings);

        assert_eq!(
            content,
            format!(
                "{DISCLAIMER}\
                 [mysqld]\nport = 3306\nbind-address = 0.0.0.0\nmax_connections = 200\n\n\
                 [client]\nsocket = /run/mysqld/mysqld.sock\n\n\
                 [mysqldump]\nquick = true\nmax_allowed_packet = 16M\n\n"
            )
        );
    }

    #[test]
    fn values_are_written_verbatim() {
        let settings = Settings::new().with_section("mysqld", [("init-connect", "SET NAMES 'utf8' # x")]);
        let content = render_content(&settings);

        assert!(content.contains("init-connect = SET NAMES 'utf8' # x\n"));
    }

    #[test]
    fn empty_value_keeps_separator() {
        let settings = Settings::new().with_section("mysqld", [("skip-external-locking", "")]);
        let content = render_content(&settings);

        assert!(content.contains("[mysqld]\nskip-external-locking = \n\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let settings = Settings::new()
            .with_section("mysqld", [("a", "1"), ("b", "2")])
            .with_section("client", [("c", "3")]);
        let renderer = ConfigRenderer::default();

        let first = renderer.render("repeat", &settings, true).unwrap();
        let second = renderer.render("repeat", &settings, true).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.content.as_bytes(), second.content.as_bytes());
    }
}

mod relationships {
    use super::*;

    #[test]
    fn notifies_restart_by_default() {
        let definition = ConfigDefinition::new("test_config", bind_address());
        let rendered = ConfigRenderer::default()
            .render_definition(&definition)
            .unwrap();

        assert_eq!(rendered.notify, Some(ResourceRef::exec("mysqld-restart")));
        assert_eq!(
            rendered.notify.unwrap().to_string(),
            "Exec[mysqld-restart]"
        );
    }

    #[test]
    fn notify_can_be_disabled() {
        let definition =
            ConfigDefinition::new("test_config", bind_address()).with_notify_service(false);
        let rendered = ConfigRenderer::default()
            .render_definition(&definition)
            .unwrap();

        assert!(rendered.notify.is_none());
        assert!(
            rendered
                .edges()
                .iter()
                .all(|e| e.relationship != Relationship::Notify)
        );
    }

    #[test]
    fn always_requires_base_config() {
        for notify in [true, false] {
            let rendered = ConfigRenderer::default()
                .render("test_config", &bind_address(), notify)
                .unwrap();

            assert_eq!(rendered.require.to_string(), "File[/etc/mysql/my.cnf]");
            assert!(rendered.edges().contains(&Edge::require(
                rendered.resource(),
                ResourceRef::file("/etc/mysql/my.cnf"),
            )));
        }
    }

    #[test]
    fn edges_with_notify() {
        let rendered = ConfigRenderer::default()
            .render("test_config", &bind_address(), true)
            .unwrap();
        let edges: Vec<String> = rendered.edges().iter().map(ToString::to_string).collect();

        assert_eq!(
            edges,
            [
                "File[/etc/mysql/my.cnf] -> File[/etc/mysql/conf.d/test_config.cnf]",
                "File[/etc/mysql/conf.d/test_config.cnf] ~> Exec[mysqld-restart]",
            ]
        );
    }

    #[test]
    fn custom_collaborators() {
        let renderer = ConfigRenderer::new(RendererOptions {
            conf_dir: PathBuf::from("/etc/my.cnf.d"),
            base_config: PathBuf::from("/etc/my.cnf"),
            restart_exec: "mariadb-restart".to_string(),
        });
        let rendered = renderer.render("tuning", &bind_address(), true).unwrap();

        assert_eq!(rendered.path, Path::new("/etc/my.cnf.d/tuning.cnf"));
        assert_eq!(rendered.require, ResourceRef::file("/etc/my.cnf"));
        assert_eq!(rendered.notify, Some(ResourceRef::exec("mariadb-restart")));
        assert_eq!(renderer.options().conf_dir, Path::new("/etc/my.cnf.d"));
    }

    #[test]
    fn default_renderer_uses_default_options() {
        let renderer = ConfigRenderer::default();
        assert_eq!(renderer.options(), &RendererOptions::default());
        assert_eq!(renderer.options().restart_exec, "mysqld-restart");
    }
}

mod paths {
    use super::*;

    #[test]
    fn path_is_derived_from_title() {
        let rendered = ConfigRenderer::default()
            .render("test_config", &bind_address(), true)
            .unwrap();

        assert_eq!(rendered.path, Path::new("/etc/mysql/conf.d/test_config.cnf"));
        assert_eq!(rendered.resource().to_string(), "File[/etc/mysql/conf.d/test_config.cnf]");
        assert_eq!(rendered.title, "test_config");
    }

    #[test]
    fn accepts_dotted_and_dashed_titles() {
        for title in ["innodb-tuning", "10_replication", "server.v2", "_local"] {
            assert!(validate_title(title).is_ok(), "expected {title:?} to be valid");
        }
    }

    #[test]
    fn rejects_empty_title() {
        assert_eq!(validate_title(""), Err(PathError::Empty));
    }

    #[test]
    fn rejects_traversal() {
        for title in ["..", "../my", "a..b"] {
            assert!(
                matches!(validate_title(title), Err(PathError::Traversal { .. })),
                "expected traversal rejection for {title:?}"
            );
        }
    }

    #[test]
    fn rejects_separators_and_specials() {
        for title in ["a/b", "/etc/passwd", "a\\b", "with space", "-flag", ".hidden", "tab\t"] {
            assert!(
                matches!(
                    validate_title(title),
                    Err(PathError::InvalidCharacters { .. })
                ),
                "expected character rejection for {title:?}"
            );
        }
    }

    #[test]
    fn rejects_overlong_title() {
        let title = "a".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(
            validate_title(&title),
            Err(PathError::TooLong { len, .. }) if len == MAX_TITLE_LEN + 1
        ));
    }
}

mod failures {
    use super::*;

    #[test]
    fn bad_title_is_path_error() {
        let result = ConfigRenderer::default().render("../escape", &bind_address(), true);
        assert!(matches!(result, Err(RenderError::Path(_))));
    }

    #[test]
    fn bad_settings_is_validation_error() {
        let settings = Settings::new().with_section("mysqld", [("key", "line\nbreak")]);
        let result = ConfigRenderer::default().render("ok", &settings, true);

        assert!(matches!(
            result,
            Err(RenderError::Validation(ValidationError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn error_display_is_transparent() {
        let err = ConfigRenderer::default()
            .render("", &bind_address(), true)
            .unwrap_err();
        assert_eq!(err.to_string(), PathError::Empty.to_string());
    }
}
