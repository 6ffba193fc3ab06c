use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use vote_certainty::*;

use std::fs;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::check::io_common::format_share;
use crate::check::payload_reader::*;

pub mod io_common;
pub mod payload_reader;

#[derive(Debug, Snafu)]
pub enum CheckError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Result {label} does not follow the results format"))]
    ParsingPayload {
        source: serde_json::Error,
        label: String,
    },
    #[snafu(display("Cannot read the election serial number {value}"))]
    ParsingSerial { value: String },
    #[snafu(display("Result {label} has an invalid option"))]
    InvalidOption {
        source: SnapshotErrors,
        label: String,
    },
    #[snafu(display("Error writing the summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CheckResult<T> = Result<T, CheckError>;

fn outcome_to_json(outcome: &FinalOutcome) -> Option<JSValue> {
    match outcome {
        FinalOutcome::StillCounting => None,
        FinalOutcome::NoVotes => Some(json!({
            "message": "No votes were counted in this election."
        })),
        FinalOutcome::Winner { name, votes, share } => Some(json!({
            "winner": name,
            "votes": votes.to_string(),
            "share": format_share(*share),
        })),
        FinalOutcome::Tie { names, votes } => Some(json!({
            "tie": names,
            "votes": votes.to_string(),
        })),
    }
}

/// The summary of one result snapshot.
fn snapshot_to_json(label: &str, snapshot: &TallySnapshot) -> JSValue {
    let mut options: JSMap<String, JSValue> = JSMap::new();
    for os in option_shares(snapshot) {
        options.insert(
            os.name,
            json!({"votes": os.votes.to_string(), "share": format_share(os.share)}),
        );
    }

    let mut res: JSMap<String, JSValue> = JSMap::new();
    res.insert("serial".to_string(), json!(label));
    res.insert(
        "status".to_string(),
        json!(if snapshot.active { "partial" } else { "final" }),
    );
    res.insert(
        "totals".to_string(),
        json!({
            "eligible": snapshot.total_eligible.to_string(),
            "cast": snapshot.total_cast.to_string(),
            "universe": snapshot.total_universe.to_string(),
            "abstention": abstention(snapshot).to_string(),
            "abstentionRate": format_share(abstention_rate(snapshot)),
        }),
    );
    res.insert("options".to_string(), JSValue::Object(options));

    if snapshot.active {
        let verdict = evaluate_certainty(snapshot);
        info!("{}: {}", label, verdict.message);
        res.insert(
            "certainty".to_string(),
            json!({
                "decided": verdict.decided,
                "leader": verdict.leader,
                "message": verdict.message,
            }),
        );
    } else if let Some(js) = outcome_to_json(&final_outcome(snapshot)) {
        info!("{}: final outcome {}", label, js);
        res.insert("outcome".to_string(), js);
    }
    JSValue::Object(res)
}

fn identifier_to_json(input: &str) -> JSValue {
    let mut res: JSMap<String, JSValue> = JSMap::new();
    res.insert("input".to_string(), json!(input));
    res.insert("formatted".to_string(), json!(format_identifier(input)));
    match validate_identifier(input) {
        Ok(_) => {
            res.insert("valid".to_string(), json!(true));
        }
        Err(e) => {
            debug!("identifier_to_json: {:?} refused: {:?}", input, e);
            res.insert("valid".to_string(), json!(false));
            res.insert("reason".to_string(), json!(e.to_string()));
        }
    }
    JSValue::Object(res)
}

/// Reads the results (if any), evaluates every snapshot and validates the identifiers.
pub fn build_summary_js(input: &Option<String>, identifiers: &[String]) -> CheckResult<JSValue> {
    let payloads: Vec<LabeledPayload> = match input {
        Some(path) => read_payloads(path)?,
        None => Vec::new(),
    };

    let mut results: Vec<JSValue> = Vec::new();
    for lp in payloads.iter() {
        let snapshot = lp.payload.to_snapshot(&lp.label)?;
        results.push(snapshot_to_json(&lp.label, &snapshot));
    }

    let identifiers_js: Vec<JSValue> = identifiers
        .iter()
        .map(|s| identifier_to_json(s))
        .collect();

    Ok(json!({
        "results": results,
        "identifiers": identifiers_js,
    }))
}

pub fn read_summary(path: &str) -> CheckResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

/// Fails if the summary differs from the reference file, after printing the differences.
pub fn check_reference(pretty_js_summary: &str, reference_path: &str) -> CheckResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref = serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_summary {
        warn!("Found differences with the reference summary {}", reference_path);
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_summary, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

fn write_summary(pretty_js_summary: &str, out: &Option<String>) -> CheckResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js_summary);
        }
        Some("") => {
            debug!("write_summary: empty output path, not writing the summary");
        }
        Some(path) => {
            info!("Writing summary to {}", path);
            fs::write(path, pretty_js_summary).context(WritingFileSnafu { path })?;
        }
    }
    Ok(())
}

pub fn run_check(args: &Args) -> CheckResult<()> {
    if args.input.is_none() && args.cpf.is_empty() {
        whatever!("Nothing to check: pass a results file with --input or identifiers with --cpf")
    }

    let summary_js = build_summary_js(&args.input, &args.cpf)?;
    let pretty_js_summary = serde_json::to_string_pretty(&summary_js).context(WritingJsonSnafu {})?;
    write_summary(&pretty_js_summary, &args.out)?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(&pretty_js_summary, reference_path)?;
    }
    Ok(())
}
