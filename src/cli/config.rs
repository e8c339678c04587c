use clap::{Parser, Subcommand};

/// Arguments for the config command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show all settings:\n    modelgate config\n\n\
                  Point at a gateway:\n    modelgate config set base_url https://gateway.example/v1\n\n\
                  Cache the model catalog:\n    modelgate config set models model-a,model-b\n\n\
                  Forget the API key:\n    modelgate config unset api_key")]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigSubcommand>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print one setting
    Get {
        /// Setting name (model, base_url, api_key, assistant, models)
        key: String,
    },

    /// Change one setting
    Set {
        /// Setting name (model, base_url, api_key, assistant, models)
        key: String,
        /// New value; `models` takes a comma-separated list
        value: String,
    },

    /// Reset one setting to its default
    Unset {
        /// Setting name (model, base_url, api_key, assistant, models)
        key: String,
    },

    /// Print every setting
    List,
}
