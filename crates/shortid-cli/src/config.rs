use anyhow::{Context, bail};
use clap::Parser;
use shortid::{DEFAULT_ALPHABET, ShortId};

/// Runtime configuration for the `shortid` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first), with defaults matching the library's default
/// generator.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shortid",
    version,
    about = "Generate short, URL-safe, time-ordered IDs"
)]
pub struct CliArgs {
    /// Worker number embedded in every ID, in `[0, 31]`.
    ///
    /// Processes writing IDs into the same space must use distinct workers.
    ///
    /// Environment variable: `SHORTID_WORKER`
    #[arg(short, long, env = "SHORTID_WORKER", default_value_t = 0, allow_negative_numbers = true)]
    pub worker: i64,

    /// Seed used to shuffle the alphabet. Keep it identical across workers.
    ///
    /// Environment variable: `SHORTID_SEED`
    #[arg(short, long, env = "SHORTID_SEED", default_value_t = 1)]
    pub seed: u64,

    /// 64 unique characters to render IDs with.
    ///
    /// Environment variable: `SHORTID_ALPHABET`
    #[arg(long, env = "SHORTID_ALPHABET", default_value_t = String::from(DEFAULT_ALPHABET), allow_hyphen_values = true)]
    pub alphabet: String,

    /// Number of IDs to print.
    ///
    /// Environment variable: `SHORTID_COUNT`
    #[arg(short = 'n', long, env = "SHORTID_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Number of threads sharing the generator.
    ///
    /// Environment variable: `SHORTID_THREADS`
    #[arg(short, long, env = "SHORTID_THREADS", default_value_t = 1)]
    pub threads: usize,

    /// Print one JSON object per line with the decoded components.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Inspect an existing ID instead of generating new ones.
    #[arg(short, long, value_name = "ID", allow_hyphen_values = true)]
    pub decode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Generate { count: usize, threads: usize },
    Decode { id: String },
}

#[derive(Debug)]
pub struct Config {
    pub generator: ShortId,
    pub mode: Mode,
    pub json: bool,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("SHORTID_COUNT must be greater than 0");
        }
        if args.threads == 0 {
            bail!("SHORTID_THREADS must be greater than 0");
        }

        let generator = ShortId::new(args.worker, &args.alphabet, args.seed)
            .context("invalid generator settings")?;

        let mode = match args.decode {
            Some(id) => Mode::Decode { id },
            None => Mode::Generate {
                count: args.count,
                // More threads than IDs would only spin up idle workers.
                threads: args.threads.min(args.count),
            },
        };

        Ok(Self {
            generator,
            mode,
            json: args.json,
        })
    }
}
