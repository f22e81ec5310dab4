#![deny(unsafe_code)]

//! trackfmt CLI: render media player format strings from the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow, bail};
use ariadne::{Config, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use trackfmt_config::AppConfig;
use trackfmt_core::{
    Context, Engine, FormatError, MetadataAliases, Query, Token, Value, build_info,
};

/// Source id shown in syntax error reports.
const FORMAT_SOURCE_ID: &str = "format";

/// Format player status, volume, position and metadata.
#[derive(Parser)]
#[command(
    name = "trackfmt",
    version,
    long_version = build_info::LONG_VERSION,
    about,
    long_about = None
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "trackfmt.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// A format string for printing properties and metadata.
    #[arg(short, long, global = true, conflicts_with = "preset")]
    format: Option<String>,

    /// Use a named format string from the configuration file.
    #[arg(short, long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a playback status.
    Status {
        /// The status reported by the player (e.g. Playing, Paused).
        status: Option<String>,
    },

    /// Print a volume level.
    Volume {
        /// Volume level from 0.0 to 1.0.
        level: f64,
    },

    /// Print a playback position.
    Position {
        /// Position in microseconds.
        #[arg(allow_negative_numbers = true)]
        micros: i64,
    },

    /// Print track metadata, or only the given KEYs.
    Metadata {
        /// Read metadata from a JSON object file.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Set a metadata entry (KEY=VALUE, repeatable).
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, Value)>,

        /// Keys to print when no format is given. May be artist, title,
        /// album, or any key found in the metadata.
        keys: Vec<String>,
    },

    /// Render the format against an arbitrary context.
    Render {
        /// Read the context from a JSON object file.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Set a context entry (KEY=VALUE, repeatable).
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, Value)>,
    },

    /// Check a format string for syntax errors and list its tokens.
    Check {
        /// The format string to check. Defaults to --format or --preset.
        #[arg(id = "check_format", value_name = "FORMAT")]
        source: Option<String>,
    },

    /// List the available template helpers.
    Helpers,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!(version = %build_info::version_string(), config = %cli.config.display(), "starting");

    let format = resolve_format(cli.format.as_deref(), cli.preset.as_deref(), &config)?;

    match cli.command {
        Commands::Status { status } => cmd_query(Query::Status(status), format, &config)?,
        Commands::Volume { level } => cmd_query(Query::Volume(level), format, &config)?,
        Commands::Position { micros } => cmd_query(Query::Position(micros), format, &config)?,
        Commands::Metadata { json, set, keys } => {
            let metadata = build_context(json.as_deref(), set)?;
            cmd_query(Query::Metadata { metadata, keys }, format, &config)?
        }
        Commands::Render { json, set } => cmd_render(json.as_deref(), set, format, &config)?,
        Commands::Check { source } => {
            let source = source
                .as_deref()
                .or(format)
                .ok_or_else(|| anyhow!("check needs a FORMAT, --format or --preset"))?;
            cmd_check(source, &config)?
        }
        Commands::Helpers => cmd_helpers(),
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

fn cmd_query(query: Query, format: Option<&str>, config: &AppConfig) -> Result<()> {
    let engine = Engine::from_config(&config.format);
    let aliases = MetadataAliases::from_config(&config.metadata);
    let template = format.map(|f| engine.compile(f)).transpose()?;
    let output = query.output(&engine, template.as_ref(), &aliases)?;
    println!("{output}");
    Ok(())
}

fn cmd_render(
    json: Option<&Path>,
    set: Vec<(String, Value)>,
    format: Option<&str>,
    config: &AppConfig,
) -> Result<()> {
    let format = format.ok_or_else(|| anyhow!("render needs --format or --preset"))?;
    let context = build_context(json, set)?;
    let engine = Engine::from_config(&config.format);
    println!("{}", engine.expand(format, &context)?);
    Ok(())
}

fn cmd_check(format: &str, config: &AppConfig) -> Result<()> {
    let engine = Engine::from_config(&config.format);
    let template = match engine.compile(format) {
        Ok(template) => template,
        Err(err) => {
            if let Some(report) = syntax_report(format, &err) {
                eprintln!("{report}");
            }
            return Err(err.into());
        }
    };

    for token in template.tokens() {
        println!("{}", describe_token(token, &engine));
    }
    let names = template.referenced_names();
    if !names.is_empty() {
        println!("reads: {}", names.join(", "));
    }
    Ok(())
}

fn cmd_helpers() {
    let registry = Engine::new().registry();
    for name in registry.names() {
        if let Some(helper) = registry.get(name) {
            println!("{name:<10} {}", helper.description());
        }
    }
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    let engine = Engine::from_config(&config.format);
    for (name, format) in &config.presets {
        engine
            .compile(format)
            .map_err(|e| anyhow!("preset {name:?}: {e}"))?;
    }

    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        AppConfig::load(path).map_err(|e| anyhow!(e))
    } else {
        debug!(path = %path.display(), "Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Pick the format string from `--format`, or look up `--preset`.
fn resolve_format<'a>(
    format: Option<&'a str>,
    preset: Option<&str>,
    config: &'a AppConfig,
) -> Result<Option<&'a str>> {
    match (format, preset) {
        (Some(format), _) => Ok(Some(format)),
        (None, Some(name)) => match config.preset(name) {
            Some(format) => Ok(Some(format)),
            None => bail!("unknown preset {name:?}"),
        },
        (None, None) => Ok(None),
    }
}

/// Build a context from an optional JSON file and `KEY=VALUE` overrides.
fn build_context(json: Option<&Path>, set: Vec<(String, Value)>) -> Result<Context> {
    let mut context = match json {
        Some(path) => read_json_context(path)?,
        None => Context::new(),
    };
    for (key, value) in set {
        context.insert(key, value);
    }
    Ok(context)
}

fn read_json_context(path: &Path) -> Result<Context> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
    match json {
        serde_json::Value::Object(object) => Ok(Context::from_json_object(object)),
        other => bail!(
            "{} must hold a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Parse `KEY=VALUE`. Integers and decimal numbers are typed; everything
/// else is text.
fn parse_assignment(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {s:?}"));
    }
    Ok((key.to_string(), infer_value(raw)))
}

fn infer_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Integer(n);
    }
    let looks_numeric = raw.chars().any(|c| c.is_ascii_digit())
        && raw.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    match raw.parse::<f64>() {
        Ok(x) if looks_numeric && x.is_finite() => Value::Float(x),
        _ => Value::Text(raw.to_string()),
    }
}

fn describe_token(token: &Token, engine: &Engine<'_>) -> String {
    match token {
        Token::Passthrough(text) => format!("text      {text:?}"),
        Token::Variable(name) => format!("variable  {name}"),
        Token::Function { name, argument } => {
            let note = if engine.registry().get(name).is_some() {
                ""
            } else {
                "  (unknown helper)"
            };
            format!("function  {name}({argument}){note}")
        }
    }
}

/// Render a syntax error as a report labelling the offending character.
/// Other errors carry no position and get no report.
fn syntax_report(format: &str, err: &FormatError) -> Option<String> {
    let FormatError::Syntax { position, message } = err else {
        return None;
    };
    // Report spans count chars; error positions are byte offsets.
    let start = format.get(..*position)?.chars().count();
    let span = start..start + 1;

    let mut out = Vec::new();
    Report::build(ReportKind::Error, (FORMAT_SOURCE_ID, span.clone()))
        .with_config(Config::default().with_color(false))
        .with_message("invalid format string")
        .with_label(Label::new((FORMAT_SOURCE_ID, span)).with_message(message))
        .finish()
        .write((FORMAT_SOURCE_ID, Source::from(format)), &mut out)
        .ok()?;
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use trackfmt_test_utils::config::{TestConfigBuilder, TestConfigFile};
    use trackfmt_test_utils::tracing_setup::init_test_tracing;

    #[test]
    fn test_parse_assignment_types() {
        assert_eq!(
            parse_assignment("volume=0.75").unwrap(),
            ("volume".to_string(), Value::Float(0.75))
        );
        assert_eq!(
            parse_assignment("mpris:length=125000000").unwrap(),
            ("mpris:length".to_string(), Value::Integer(125_000_000))
        );
        assert_eq!(
            parse_assignment("title=Heroes").unwrap(),
            ("title".to_string(), Value::from("Heroes"))
        );
        assert_eq!(
            parse_assignment("equation=a=b").unwrap(),
            ("equation".to_string(), Value::from("a=b"))
        );
    }

    #[test]
    fn test_parse_assignment_keeps_words_as_text() {
        assert_eq!(parse_assignment("x=inf").unwrap().1, Value::from("inf"));
        assert_eq!(parse_assignment("x=NaN").unwrap().1, Value::from("NaN"));
        assert_eq!(parse_assignment("x=").unwrap().1, Value::from(""));
    }

    #[test]
    fn test_parse_assignment_rejects_bad_input() {
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn test_resolve_format() {
        let config = TestConfigBuilder::new().preset("np", "{{title}}").build();
        assert_eq!(resolve_format(Some("{{x}}"), None, &config).unwrap(), Some("{{x}}"));
        assert_eq!(resolve_format(None, Some("np"), &config).unwrap(), Some("{{title}}"));
        assert_eq!(resolve_format(None, None, &config).unwrap(), None);
        assert!(resolve_format(None, Some("missing"), &config).is_err());
    }

    #[test]
    fn test_syntax_report_labels_error_column() {
        let format = "{{fn()}}";
        let err = trackfmt_core::tokenize(format).unwrap_err();
        let report = syntax_report(format, &err).unwrap();
        assert!(report.contains("invalid format string"), "{report}");
        assert!(report.contains("format:1:6"), "{report}");
        assert!(report.contains(format), "{report}");
        assert!(report.contains("expected a function parameter"), "{report}");
    }

    #[test]
    fn test_syntax_report_counts_chars_not_bytes() {
        let format = "é {{";
        let err = trackfmt_core::tokenize(format).unwrap_err();
        assert_eq!(err.position(), Some(3));
        let report = syntax_report(format, &err).unwrap();
        assert!(report.contains("format:1:3"), "{report}");
    }

    #[test]
    fn test_syntax_report_skips_unpositioned_errors() {
        let err = FormatError::UnknownFunction("nope".to_string());
        assert_eq!(syntax_report("{{nope(x)}}", &err), None);
    }

    #[test]
    fn test_build_context_from_json_and_overrides() {
        init_test_tracing();
        let file = TestConfigFile::with_toml("");
        let json_path = file.sibling("metadata.json");
        std::fs::write(&json_path, r#"{"xesam:title": "Heroes", "mpris:length": 1}"#).unwrap();

        let context = build_context(
            Some(&json_path),
            vec![("mpris:length".to_string(), Value::Integer(2))],
        )
        .unwrap();
        assert_eq!(context.get("xesam:title"), Some(&Value::from("Heroes")));
        assert_eq!(context.get("mpris:length"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_json_context_must_be_object() {
        let file = TestConfigFile::with_toml("");
        let json_path = file.sibling("list.json");
        std::fs::write(&json_path, "[1, 2]").unwrap();

        let err = read_json_context(&json_path).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/trackfmt.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_command_rejects_bad_preset() {
        init_test_tracing();
        let config = TestConfigBuilder::new().preset("broken", "{{title").build();
        let err = cmd_config(Path::new("trackfmt.toml"), &config, false).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_describe_token_flags_unknown_helpers() {
        let engine = Engine::new();
        let known = Token::Function {
            name: "lc".to_string(),
            argument: "title".to_string(),
        };
        let unknown = Token::Function {
            name: "nope".to_string(),
            argument: "title".to_string(),
        };
        assert_eq!(describe_token(&known, &engine), "function  lc(title)");
        assert!(describe_token(&unknown, &engine).ends_with("(unknown helper)"));
    }
}
