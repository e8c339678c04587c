use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    modelgate completions --shell bash > ~/.bash_completion.d/modelgate\n\n\
                  Generate zsh completions:\n    modelgate completions --shell zsh > ~/.zfunc/_modelgate\n\n\
                  Generate fish completions:\n    modelgate completions --shell fish > ~/.config/fish/completions/modelgate.fish\n\n\
                  Generate PowerShell completions:\n    modelgate completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, short = 's')]
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["modelgate", "completions", "--shell", "bash"]).unwrap();
        match cli.command {
            Some(Commands::Completions(args)) => assert_eq!(args.shell, "bash"),
            _ => panic!("Expected Completions command"),
        }
    }
}
