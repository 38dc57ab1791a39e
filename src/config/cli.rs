use crate::config::Settings;
use crate::domain::model::Engine;
use crate::utils::error::{Result, SyncError};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sales-sync")]
#[command(about = "Sync per-product sales totals from MySQL, PostgreSQL or Firebird into Supabase")]
pub struct CliConfig {
    /// Skip the interactive prompt (mysql, postgresql, firebird)
    #[arg(long)]
    pub engine: Option<Engine>,

    #[arg(long, help = "TOML profile with credentials; environment variables take precedence")]
    pub config: Option<PathBuf>,

    /// Target table [default: sales_summary, or the profile's value]
    #[arg(long)]
    pub table: Option<String>,

    /// Upsert conflict column [default: Produto, or the profile's value]
    #[arg(long)]
    pub conflict_column: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Flags given on the command line win over the profile and the defaults.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(table) = &self.table {
            settings.target.table = table.clone();
        }
        if let Some(column) = &self.conflict_column {
            settings.target.conflict_column = column.clone();
        }
    }
}

/// 互動式選擇資料庫 (1/2/3)
pub fn prompt_engine<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Engine> {
    writeln!(output, "Choose the database:")?;
    for (index, engine) in Engine::ALL.iter().enumerate() {
        writeln!(output, "{}. {}", index + 1, engine)?;
    }
    write!(output, "Enter the number of your choice: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    parse_engine_choice(&line)
}

pub fn parse_engine_choice(input: &str) -> Result<Engine> {
    let choice: u32 = input.trim().parse().map_err(|_| SyncError::InvalidConfigValueError {
        field: "engine".to_string(),
        value: input.trim().to_string(),
        reason: "Invalid input, enter a number between 1 and 3".to_string(),
    })?;

    Engine::from_choice(choice).ok_or_else(|| SyncError::InvalidConfigValueError {
        field: "engine".to_string(),
        value: choice.to_string(),
        reason: "Invalid choice, enter a number between 1 and 3".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_choice() {
        assert_eq!(parse_engine_choice("1\n").unwrap(), Engine::MySql);
        assert_eq!(parse_engine_choice(" 3 ").unwrap(), Engine::Firebird);

        let err = parse_engine_choice("abc").unwrap_err();
        assert!(err.to_string().contains("Invalid input"));

        let err = parse_engine_choice("7").unwrap_err();
        assert!(err.to_string().contains("Invalid choice"));
    }

    #[test]
    fn test_prompt_engine_lists_options() {
        let mut output = Vec::new();
        let engine = prompt_engine("2\n".as_bytes(), &mut output).unwrap();
        assert_eq!(engine, Engine::PostgreSql);

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("1. MySQL/MariaDB"));
        assert!(printed.contains("3. Firebird"));
    }

    #[test]
    fn test_cli_parses_engine_flag() {
        let config = CliConfig::parse_from(["sales-sync", "--engine", "postgres", "--verbose"]);
        assert_eq!(config.engine, Some(Engine::PostgreSql));
        assert_eq!(config.table, None);
        assert_eq!(config.conflict_column, None);
        assert!(config.verbose);
    }

    #[test]
    fn test_profile_target_survives_without_flags() {
        let profile = crate::config::SyncProfile::from_toml_str(
            "[target]\ntable = \"staging\"\nconflict_column = \"Codigo\"\n",
            |_| None,
        )
        .unwrap();
        let mut settings = Settings::default();
        settings.apply_profile(profile);

        let config = CliConfig::parse_from(["sales-sync", "--engine", "mysql"]);
        config.apply_to(&mut settings);

        assert_eq!(settings.target.table, "staging");
        assert_eq!(settings.target.conflict_column, "Codigo");
    }

    #[test]
    fn test_table_flag_overrides_profile() {
        let profile =
            crate::config::SyncProfile::from_toml_str("[target]\ntable = \"staging\"\n", |_| None)
                .unwrap();
        let mut settings = Settings::default();
        settings.apply_profile(profile);

        let config = CliConfig::parse_from(["sales-sync", "--table", "sales_summary_v2"]);
        config.apply_to(&mut settings);

        assert_eq!(settings.target.table, "sales_summary_v2");
        assert_eq!(settings.target.conflict_column, "Produto");
    }
}
