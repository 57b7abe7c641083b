// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo invocations used locally and in CI, plus one
//! database check:
//!
//! - `cargo xtask verify-schema` applies the embedded `SQLite` migrations to
//!   an in-memory database, compares the result against the Diesel table
//!   definitions in `crates/persistence/src/diesel_schema.rs`, then reverts
//!   every migration and checks that no table is left behind.
//!
//! The check needs no external services, so it runs as part of `ci`.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context, eyre::eyre};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

const DIESEL_SCHEMA_PATH: &str = "crates/persistence/src/diesel_schema.rs";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, schema)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    // Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Lint markdown files
    #[command(visible_alias = "md")]
    LintMarkdown,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Verify migrations against the Diesel schema and check they revert cleanly
    #[command(visible_alias = "vs")]
    VerifySchema,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::LintMarkdown => lint_markdown(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifySchema => verify_schema(),
        }
    }
}

/// Run CI checks (lint, build, test, schema)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_schema()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, typos, clippy, and docs (and a soft fail on markdown)
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    if let Err(err) = lint_markdown() {
        tracing::warn!("known issue: markdownlint is currently noisy and can be ignored: {err}");
    }
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Lint markdown files using [markdownlint-cli2](https://github.com/DavidAnson/markdownlint-cli2)
fn lint_markdown() -> Result<()> {
    cmd!("markdownlint-cli2", "**/*.md", "!target", "!**/target").run_with_trace()?;

    Ok(())
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run tests for libs and docs
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Verify the migrations against the Diesel table definitions.
///
/// ## What This Command Does
///
/// 1. Applies every embedded migration to an in-memory `SQLite` database
/// 2. Introspects the resulting tables, columns and primary keys
/// 3. Parses the `diesel::table!` blocks of the persistence crate
/// 4. Fails on any table, column, type, nullability, or key mismatch
/// 5. Reverts every migration and fails if any table survives
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-schema
/// ```
fn verify_schema() -> Result<()> {
    tracing::info!("Applying migrations to an in-memory database");
    let mut conn =
        SqliteConnection::establish(":memory:").wrap_err("Failed to open in-memory SQLite")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;

    tracing::info!("Introspecting migrated schema");
    let migrated: Schema = introspect_sqlite_schema(&mut conn)?;

    tracing::info!("Parsing {DIESEL_SCHEMA_PATH}");
    let workspace_root = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?
        .workspace_root;
    let source: String = std::fs::read_to_string(workspace_root.join(DIESEL_SCHEMA_PATH))
        .wrap_err(format!("Failed to read {DIESEL_SCHEMA_PATH}"))?;
    let declared: Schema = parse_diesel_schema(&source)?;

    tracing::info!("Comparing schemas");
    compare_schemas(&migrated, &declared)?;

    tracing::info!("Reverting all migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let leftover: Schema = introspect_sqlite_schema(&mut conn)?;
    if !leftover.tables.is_empty() {
        return Err(eyre!(
            "❌ Schema check FAILED: tables left after reverting all migrations: {:?}",
            leftover.tables.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("✓ Schema verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

/// Introspect `SQLite` schema
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            // SQLite reports `INTEGER PRIMARY KEY` as nullable; it never is.
            let is_pk: bool = col.pk > 0;
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    nullable: col.notnull == 0 && !is_pk,
                },
            );
            if is_pk {
                table_info.primary_keys.insert(col.name);
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Parse the `diesel::table!` blocks of a Diesel schema file.
///
/// Only the shape Diesel CLI generates is understood: one table per block,
/// a parenthesized primary key list, and one `column -> Type,` per line.
fn parse_diesel_schema(source: &str) -> Result<Schema> {
    let mut schema = Schema {
        tables: BTreeMap::new(),
    };
    let mut current: Option<(String, Table)> = None;

    for line in source.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if line == "}" {
            if let Some((name, table)) = current.take() {
                schema.tables.insert(name, table);
            }
            continue;
        }

        if let Some((name, table)) = current.as_mut() {
            if let Some((column, ty)) = line.trim_end_matches(',').split_once("->") {
                let ty: &str = ty.trim();
                let (inner, nullable): (&str, bool) = ty
                    .strip_prefix("Nullable<")
                    .and_then(|rest| rest.strip_suffix('>'))
                    .map_or((ty, false), |inner| (inner, true));
                table.columns.insert(
                    column.trim().to_string(),
                    Column {
                        normalized_type: normalize_diesel_type(inner),
                        nullable,
                    },
                );
            } else {
                return Err(eyre!("Unexpected line in table '{name}': {line}"));
            }
            continue;
        }

        // Table header: `name (pk_a, pk_b) {`
        if let Some((name, rest)) = line.strip_suffix('{').and_then(|l| l.split_once('(')) {
            let keys: &str = rest
                .trim()
                .strip_suffix(')')
                .ok_or_else(|| eyre!("Malformed table header: {line}"))?;
            current = Some((
                name.trim().to_string(),
                Table {
                    columns: BTreeMap::new(),
                    primary_keys: keys.split(',').map(|k| k.trim().to_string()).collect(),
                },
            ));
        }
    }

    if let Some((name, _)) = current {
        return Err(eyre!("Unterminated table block '{name}'"));
    }
    Ok(schema)
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

/// Normalize a Diesel SQL type name to common representation
#[allow(clippy::match_same_arms)]
fn normalize_diesel_type(diesel_type: &str) -> String {
    match diesel_type {
        "SmallInt" | "Integer" | "BigInt" | "Bool" => "integer".to_string(),
        "Float" | "Double" => "real".to_string(),
        "Binary" => "blob".to_string(),
        _ => "text".to_string(),
    }
}

/// Compare schemas and fail on mismatch
fn compare_schemas(migrated: &Schema, declared: &Schema) -> Result<()> {
    let migrated_tables: BTreeSet<_> = migrated.tables.keys().collect();
    let declared_tables: BTreeSet<_> = declared.tables.keys().collect();

    if migrated_tables != declared_tables {
        return Err(eyre!(
            "❌ Schema check FAILED: table mismatch\n  Only in migrations: {:?}\n  Only in diesel_schema.rs: {:?}",
            migrated_tables.difference(&declared_tables).collect::<Vec<_>>(),
            declared_tables.difference(&migrated_tables).collect::<Vec<_>>()
        ));
    }

    for (table_name, migrated_table) in &migrated.tables {
        let declared_table = &declared.tables[table_name];

        if migrated_table.primary_keys != declared_table.primary_keys {
            return Err(eyre!(
                "❌ Schema check FAILED: primary key mismatch in table '{}'\n  Migrations: {:?}\n  diesel_schema.rs: {:?}",
                table_name,
                migrated_table.primary_keys,
                declared_table.primary_keys
            ));
        }

        if migrated_table.columns != declared_table.columns {
            return Err(eyre!(
                "❌ Schema check FAILED: column mismatch in table '{}'\n  Migrations: {:?}\n  diesel_schema.rs: {:?}",
                table_name,
                migrated_table.columns,
                declared_table.columns
            ));
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
