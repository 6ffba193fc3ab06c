use clap::Parser;

/// Checks election result snapshots for a settled outcome and validates voter identifiers.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the results, in the JSON format of the results backend.
    /// It may contain a single result object or a list of them.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (repeatable) A CPF number to validate. Punctuation is ignored.
    #[clap(long, value_parser)]
    pub cpf: Vec<String>,

    /// (file path, 'stdout' or empty) Where to write the summary in JSON format. Defaults to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected summary in JSON format. If provided, votecheck will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
