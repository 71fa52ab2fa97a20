use clap::Parser;

#[derive(Parser)]
#[command(
    name = "nftspec",
    about = "nftspec: compile a declarative ERC-721 feature specification into Solidity sources",
    version
)]
pub struct Cli {
    /// Path to the specification (TOML, or JSON with a `.json` extension)
    pub spec: String,

    /// Skeleton directory holding one template per artifact
    #[arg(long, default_value = "skeleton")]
    pub skeleton: String,

    /// Output directory
    #[arg(long, default_value = "output")]
    pub out: String,

    /// Replace an existing output directory without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
