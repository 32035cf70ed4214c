//! Generates the signed voting input of a demo poll.
//!
//! Voter keys follow the schedule `key_step * voter_id + key_base`. The output lists the voters'
//! public keys and the signed ballots as pretty-printed JSON.

use std::{fs, io, path::PathBuf, process::ExitCode};

use clap::Parser;
use log::{LevelFilter, error, info};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root, runtime::ConfigErrors},
    encode::pattern::PatternEncoder,
};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;
use vote_crypto::{
    FieldElement, Scalar,
    vote::{
        Ballot, DEMO_KEY_BASE, DEMO_KEY_STEP, DEMO_POLL_ID, DEMO_VOTERS, KeySchedule, VoteError,
        VotingInput,
    },
};

#[derive(Parser, Debug)]
#[command(name = "vote-crypto", about = "Generate signed votes for a demo poll")]
struct Args {
    /// Identifier of the poll, decimal or 0x-prefixed hex
    #[arg(long, default_value_t = FieldElement::from_u64(DEMO_POLL_ID))]
    poll_id: FieldElement,

    /// Number of voters
    #[arg(long, default_value_t = DEMO_VOTERS)]
    voters: usize,

    /// Private key of voter 0, decimal or 0x-prefixed hex
    #[arg(long, default_value_t = Scalar::from_u64(DEMO_KEY_BASE))]
    key_base: Scalar,

    /// Difference between the private keys of consecutive voters
    #[arg(long, default_value_t = Scalar::from_u64(DEMO_KEY_STEP))]
    key_step: Scalar,

    /// A ballot to sign; may be repeated
    #[arg(
        long = "vote",
        value_name = "VOTER:VOTE",
        value_parser = parse_ballot,
        default_values = ["3:0", "5:1", "8:0"],
    )]
    ballots: Vec<Ballot>,

    /// Comma-separated previous vote of every voter
    #[arg(long, value_delimiter = ',')]
    prev_state: Option<Vec<u64>>,

    /// Output file, or `-` for standard output
    #[arg(short, long, default_value = "voting_input.json")]
    output: PathBuf,

    /// Verbosity of the console log
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to configure logging")]
    LogConfig(#[from] ConfigErrors),
    #[error("failed to install the logger")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Vote(#[from] VoteError),
    #[error("failed to encode the voting input")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_logging(args.log_level) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let schedule = KeySchedule::new(args.key_base, args.key_step);
    let input = VotingInput::build(
        args.poll_id,
        &schedule,
        args.voters,
        &args.ballots,
        args.prev_state.clone(),
    )?;
    input.verify(args.poll_id)?;
    info!(
        "signed {} votes of {} voters for poll {}",
        input.votes.len(),
        input.public_keys.len(),
        args.poll_id
    );

    let json = to_pretty_json(&input)?;
    if args.output.as_os_str() == "-" {
        print!("{}", String::from_utf8_lossy(&json));
    } else {
        fs::write(&args.output, json)
            .map_err(|source| CliError::Write { path: args.output.clone(), source })?;
        info!("wrote {}", args.output.display());
    }
    Ok(())
}

fn init_logging(level: LevelFilter) -> Result<(), CliError> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Encodes the input as JSON indented by four spaces, followed by a newline.
fn to_pretty_json(input: &VotingInput) -> Result<Vec<u8>, serde_json::Error> {
    let mut json = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(b"    "));
    input.serialize(&mut serializer)?;
    json.push(b'\n');
    Ok(json)
}

/// Parses a `VOTER:VOTE` pair.
fn parse_ballot(value: &str) -> Result<Ballot, String> {
    let (voter_id, vote) =
        value.split_once(':').ok_or_else(|| format!("expected VOTER:VOTE, found `{value}`"))?;
    let voter_id = voter_id.trim().parse().map_err(|err| format!("invalid voter id: {err}"))?;
    let vote = vote.trim().parse().map_err(|err| format!("invalid vote: {err}"))?;
    Ok(Ballot::new(voter_id, vote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_output_matches_reference_file() {
        let input = VotingInput::demo().unwrap();
        let json = to_pretty_json(&input).unwrap();
        assert_eq!(
            String::from_utf8(json).unwrap(),
            include_str!("vote/voting_input.json")
        );
    }

    #[test]
    fn prev_state_is_appended_last() {
        let input = VotingInput::build(
            FieldElement::from_u64(DEMO_POLL_ID),
            &KeySchedule::default(),
            1,
            &[],
            Some(vec![1]),
        )
        .unwrap();
        let json = String::from_utf8(to_pretty_json(&input).unwrap()).unwrap();
        assert!(json.ends_with("    \"votes\": [],\n    \"prev_state\": [\n        1\n    ]\n}\n"));
    }

    #[test]
    fn parse_ballots() {
        assert_eq!(parse_ballot("3:0"), Ok(Ballot::new(3, 0)));
        assert_eq!(parse_ballot(" 8 : 2 "), Ok(Ballot::new(8, 2)));
        assert!(parse_ballot("3").is_err());
        assert!(parse_ballot("x:1").is_err());
        assert!(parse_ballot("1:-1").is_err());
    }

    #[test]
    fn default_arguments_reproduce_the_demo() {
        let args = Args::try_parse_from(["vote-crypto"]).unwrap();
        assert_eq!(args.ballots, vote_crypto::vote::DEMO_BALLOTS);
        assert_eq!(args.key_base, Scalar::from_u64(654_321));
        assert_eq!(args.output, PathBuf::from("voting_input.json"));
        assert_eq!(args.prev_state, None);

        let args = Args::try_parse_from([
            "vote-crypto",
            "--poll-id",
            "0x2723",
            "--vote",
            "1:1",
            "--prev-state",
            "0,1,2",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.poll_id, FieldElement::from_u64(10019));
        assert_eq!(args.ballots, [Ballot::new(1, 1)]);
        assert_eq!(args.prev_state, Some(vec![0, 1, 2]));
        assert_eq!(args.log_level, LevelFilter::Debug);
    }
}
