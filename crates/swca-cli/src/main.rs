//! SWTOR Character Assembler CLI
//!
//! This binary gathers the assets of characters exported from the SWTOR
//! character viewers, imports them into Blender and organises the result.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use swca_assembler::AssembleOptions;
use swca_backend_blender::DEFAULT_TIMEOUT_SECS;

use swca_cli::commands;
use swca_cli::commands::assemble::HostSettings;

/// swca - SWTOR Character Assembler
#[derive(Parser)]
#[command(name = "swca")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Preferences file (default: <config dir>/swca/preferences.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gather a character's assets and import it into a .blend
    Assemble {
        /// Path to the character's paths.json
        manifest: PathBuf,

        /// The extraction's 'resources' folder (overrides SWCA_RESOURCES and preferences)
        #[arg(short, long)]
        resources: Option<PathBuf>,

        /// Only copy assets into the character folder
        #[arg(long)]
        gather_only: bool,

        /// Overwrite files already present in the character folder
        #[arg(long)]
        overwrite: bool,

        /// Leave imported objects where the importer put them
        #[arg(long)]
        no_collect: bool,

        /// Delete body parts, keeping only armor gear
        #[arg(long)]
        armor_only: bool,

        /// Do not import the skeleton
        #[arg(long)]
        no_skeleton: bool,

        /// Do not parent objects to the skeleton
        #[arg(long)]
        no_bind: bool,

        /// Session .blend (default: <character folder>/<character>.blend)
        #[arg(long)]
        blend: Option<PathBuf>,

        /// Blender executable
        #[arg(long)]
        blender: Option<PathBuf>,

        /// Timeout for each Blender run, in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the copy plan of a character without copying anything
    Plan {
        /// Path to the character's paths.json
        manifest: PathBuf,

        /// The extraction's 'resources' folder (overrides SWCA_RESOURCES and preferences)
        #[arg(short, long)]
        resources: Option<PathBuf>,

        /// Output the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check preferences, the 'resources' folder and Blender
    Doctor,

    /// Show or edit preferences
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Prefix objects, their materials and collections in a .blend
    Prefix {
        /// The .blend to edit
        #[arg(long)]
        blend: PathBuf,

        /// Text prepended to every name
        #[arg(short, long)]
        prefix: String,

        /// Object to prefix (repeatable)
        #[arg(long = "object")]
        objects: Vec<String>,

        /// Collection whose objects are prefixed (repeatable)
        #[arg(long = "collection")]
        collections: Vec<String>,

        /// Blender executable
        #[arg(long)]
        blender: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the preferences
    Show,
    /// Set the extraction's 'resources' folder
    SetResources {
        /// Path to the 'resources' folder
        folder: PathBuf,
    },
    /// Set the Blender executable
    SetBlender {
        /// Path to the Blender executable
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Assemble {
            manifest,
            resources,
            gather_only,
            overwrite,
            no_collect,
            armor_only,
            no_skeleton,
            no_bind,
            blend,
            blender,
            timeout,
            json,
        } => {
            let options = AssembleOptions {
                gather_only,
                preserve_existing: !overwrite,
                collect: !no_collect,
                armor_only,
                import_skeleton: !no_skeleton,
                bind_to_skeleton: !no_bind,
            };
            let host = HostSettings {
                blend,
                blender,
                timeout_secs: timeout,
            };
            commands::assemble::run(&manifest, resources.as_deref(), options, &host, config, json)
        }
        Commands::Plan {
            manifest,
            resources,
            json,
        } => commands::plan::run(&manifest, resources.as_deref(), config, json),
        Commands::Doctor => commands::doctor::run(config),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(config),
            ConfigCommands::SetResources { folder } => {
                commands::config::set_resources(config, &folder)
            }
            ConfigCommands::SetBlender { path } => commands::config::set_blender(config, &path),
        },
        Commands::Prefix {
            blend,
            prefix,
            objects,
            collections,
            blender,
        } => {
            let host = HostSettings {
                blend: Some(blend),
                blender,
                ..Default::default()
            };
            commands::prefix::run(&host, &prefix, &objects, &collections, config)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_assemble_defaults() {
        let cli = Cli::try_parse_from(["swca", "assemble", "Satele_Shan/Satele_Shan/paths.json"])
            .unwrap();
        match cli.command {
            Commands::Assemble {
                manifest,
                resources,
                gather_only,
                overwrite,
                no_collect,
                timeout,
                json,
                ..
            } => {
                assert_eq!(manifest, PathBuf::from("Satele_Shan/Satele_Shan/paths.json"));
                assert!(resources.is_none());
                assert!(!gather_only);
                assert!(!overwrite);
                assert!(!no_collect);
                assert_eq!(timeout, DEFAULT_TIMEOUT_SECS);
                assert!(!json);
            }
            _ => panic!("expected assemble command"),
        }
    }

    #[test]
    fn test_cli_parses_assemble_flags() {
        let cli = Cli::try_parse_from([
            "swca",
            "--config",
            "prefs.json",
            "assemble",
            "paths.json",
            "--resources",
            "/extraction/resources",
            "--armor-only",
            "--no-bind",
            "--blend",
            "out.blend",
            "--timeout",
            "60",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("prefs.json")));
        match cli.command {
            Commands::Assemble {
                resources,
                armor_only,
                no_bind,
                no_skeleton,
                blend,
                timeout,
                ..
            } => {
                assert_eq!(resources, Some(PathBuf::from("/extraction/resources")));
                assert!(armor_only);
                assert!(no_bind);
                assert!(!no_skeleton);
                assert_eq!(blend, Some(PathBuf::from("out.blend")));
                assert_eq!(timeout, 60);
            }
            _ => panic!("expected assemble command"),
        }
    }

    #[test]
    fn test_cli_requires_manifest() {
        let err = Cli::try_parse_from(["swca", "assemble"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_parses_plan_json() {
        let cli = Cli::try_parse_from(["swca", "plan", "paths.json", "--json"]).unwrap();
        match cli.command {
            Commands::Plan { json, .. } => assert!(json),
            _ => panic!("expected plan command"),
        }
    }

    #[test]
    fn test_cli_parses_config_set_resources() {
        let cli =
            Cli::try_parse_from(["swca", "config", "set-resources", "/extraction/resources"])
                .unwrap();
        match cli.command {
            Commands::Config {
                command: ConfigCommands::SetResources { folder },
            } => assert_eq!(folder, PathBuf::from("/extraction/resources")),
            _ => panic!("expected config set-resources command"),
        }
    }

    #[test]
    fn test_cli_parses_prefix_repeated_names() {
        let cli = Cli::try_parse_from([
            "swca",
            "prefix",
            "--blend",
            "scene.blend",
            "--prefix",
            "SAT ",
            "--object",
            "bfnnew_skeleton",
            "--object",
            "naked_torso",
            "--collection",
            "GEAR",
        ])
        .unwrap();
        match cli.command {
            Commands::Prefix {
                prefix,
                objects,
                collections,
                ..
            } => {
                assert_eq!(prefix, "SAT ");
                assert_eq!(objects, vec!["bfnnew_skeleton", "naked_torso"]);
                assert_eq!(collections, vec!["GEAR"]);
            }
            _ => panic!("expected prefix command"),
        }
    }

    #[test]
    fn test_cli_parses_doctor() {
        let cli = Cli::try_parse_from(["swca", "doctor"]).unwrap();
        assert!(matches!(cli.command, Commands::Doctor));
    }
}
