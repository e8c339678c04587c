use clap::Parser;

/// Arguments for the model command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Pick from the cached catalog:\n    modelgate model\n\n\
                  Pick from an explicit list:\n    modelgate model model-a model-b\n\n\
                  Set directly:\n    modelgate model --set model-a")]
pub struct ModelArgs {
    /// Select this model without prompting
    #[arg(long, value_name = "ID", conflicts_with = "ids")]
    pub set: Option<String>,

    /// Model identifiers to choose from (defaults to the cached `models` setting)
    pub ids: Vec<String>,
}
