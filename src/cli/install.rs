use clap::Parser;
use std::path::PathBuf;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install into the current directory:\n    handoff-installer install --bundle ./dist\n\n\
                   Install into another project:\n    handoff-installer install ../my-app --bundle ./dist\n\n\
                   Install with a publisher config:\n    handoff-installer install --bundle ./dist --config ./dist/install.json")]
pub struct InstallArgs {
    /// Target directory (defaults to the current directory, created if missing)
    pub target: Option<PathBuf>,

    /// Directory holding the files to install
    #[arg(long, short = 'b', value_name = "DIR", env = "HANDOFF_BUNDLE_DIR")]
    pub bundle: PathBuf,

    /// Install configuration file (JSON or YAML)
    #[arg(long, short = 'c', value_name = "FILE", env = "HANDOFF_INSTALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not back up an existing handoffs/ directory
    #[arg(long)]
    pub no_backup: bool,

    /// Leave .roomodes untouched
    #[arg(long)]
    pub no_merge_modes: bool,

    /// Leave .clinerules untouched
    #[arg(long)]
    pub no_merge_rules: bool,

    /// Do not keep .bak copies of merged config files
    #[arg(long)]
    pub no_config_backup: bool,

    /// Hide the progress bar and informational logs
    #[arg(long, short = 'q')]
    pub quiet: bool,
}
