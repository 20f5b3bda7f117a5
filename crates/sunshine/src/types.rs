//! Serde types for Sunshine's `apps.json`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sunray_model::GameRecord;

/// One Sunshine app entry.
///
/// Only the fields sunray owns are typed; everything else Sunshine (or the
/// user) put on the entry lands in `extra` and is written back verbatim.
/// `sunray_id` is the identity marker for entries added by sunray; Sunshine
/// ignores unknown per-app fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    #[serde(
        rename = "image-path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_path: Option<String>,

    #[serde(
        rename = "working-dir",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub working_dir: Option<String>,

    #[serde(rename = "sunray-id", default, skip_serializing_if = "Option::is_none")]
    pub sunray_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl App {
    /// Builds a Sunshine entry from a discovered game, with the launch
    /// defaults Sunshine expects for detached game processes.
    pub fn from_record(record: &GameRecord) -> Self {
        let mut extra = Map::new();
        extra.insert("auto-detach".into(), Value::String("true".into()));
        extra.insert("wait-all".into(), Value::String("true".into()));
        extra.insert("exit-timeout".into(), Value::String("5".into()));

        App {
            name: record.name.clone(),
            cmd: Some(shell_join(&record.launch)),
            image_path: record
                .artwork
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            working_dir: record
                .working_dir
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            sunray_id: Some(record.identity().to_string()),
            extra,
        }
    }
}

/// The full `apps.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppsConfig {
    #[serde(default = "default_env")]
    pub env: Value,

    #[serde(default)]
    pub apps: Vec<App>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AppsConfig {
    fn default() -> Self {
        AppsConfig {
            env: default_env(),
            apps: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Stock env block Sunshine ships in a fresh apps.json.
fn default_env() -> Value {
    serde_json::json!({ "PATH": "$(PATH):$(HOME)/.local/bin" })
}

/// Joins an argv into the single command string Sunshine's `cmd` field
/// expects, quoting arguments that need it.
pub fn shell_join(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| quote_arg(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(arg: &str) -> String {
    let needs_quotes =
        arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || "\"'`$\\".contains(c));
    if needs_quotes {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunray_model::{LauncherKind, RawDescriptor, normalize};

    fn record() -> GameRecord {
        let raw = RawDescriptor {
            native_id: Some("504230".into()),
            name: Some("Celeste".into()),
            launch: vec!["steam".into(), "steam://rungameid/504230".into()],
            working_dir: None,
        };
        normalize(raw, LauncherKind::Steam).unwrap()
    }

    #[test]
    fn shell_join_plain_args() {
        let argv: Vec<String> = vec!["steam".into(), "steam://rungameid/1".into()];
        assert_eq!(shell_join(&argv), "steam steam://rungameid/1");
    }

    #[test]
    fn shell_join_quotes_spaces() {
        let argv: Vec<String> = vec!["-p".into(), "My Game.exe".into()];
        assert_eq!(shell_join(&argv), "-p \"My Game.exe\"");
    }

    #[test]
    fn shell_join_escapes_quotes() {
        let argv: Vec<String> = vec![r#"say "hi""#.into()];
        assert_eq!(shell_join(&argv), r#""say \"hi\"""#);
    }

    #[test]
    fn from_record_fills_defaults() {
        let app = App::from_record(&record());
        assert_eq!(app.name, "Celeste");
        assert_eq!(app.cmd.as_deref(), Some("steam steam://rungameid/504230"));
        assert_eq!(app.sunray_id.as_deref(), Some("steam:504230"));
        assert_eq!(
            app.extra.get("auto-detach"),
            Some(&Value::String("true".into()))
        );
        assert_eq!(
            app.extra.get("exit-timeout"),
            Some(&Value::String("5".into()))
        );
        assert!(app.image_path.is_none());
    }

    #[test]
    fn unknown_fields_roundtrip() {
        let json = r#"{
            "name": "Desktop",
            "prep-cmd": [{"do": "x", "undo": "y"}],
            "exclude-global-prep-cmd": "false"
        }"#;
        let app: App = serde_json::from_str(json).unwrap();
        assert!(app.sunray_id.is_none());
        assert!(app.extra.contains_key("prep-cmd"));

        let back = serde_json::to_value(&app).unwrap();
        assert_eq!(back["prep-cmd"][0]["do"], "x");
        assert_eq!(back["exclude-global-prep-cmd"], "false");
    }

    #[test]
    fn apps_config_default_env() {
        let config = AppsConfig::default();
        assert_eq!(config.env["PATH"], "$(PATH):$(HOME)/.local/bin");
        assert!(config.apps.is_empty());
    }

    #[test]
    fn apps_config_preserves_root_fields() {
        let json = r#"{"env": {"PATH": "/bin"}, "apps": [], "version": 2}"#;
        let config: AppsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extra.get("version"), Some(&Value::from(2)));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["version"], 2);
        assert_eq!(back["env"]["PATH"], "/bin");
    }
}
