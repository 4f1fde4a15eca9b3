use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "recipe-ratings backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema
    Init {
        /// Drop existing tables first
        #[arg(long)]
        reset: bool,
    },
    /// Print the best rated recipes
    Best {
        /// Number of recipes to print (defaults to RANKING_DEFAULT_LIMIT)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print the average rating of one recipe
    Rating {
        /// Recipe id
        recipe_id: String,
    },
}
