use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    handoff-installer completions bash > ~/.bash_completion.d/handoff-installer\n\n\
                  Generate zsh completions:\n    handoff-installer completions zsh > ~/.zfunc/_handoff-installer\n\n\
                  Generate fish completions:\n    handoff-installer completions fish > ~/.config/fish/completions/handoff-installer.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
