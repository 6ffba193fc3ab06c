use crate::check::io_common::make_default_label;
use crate::check::*;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::collections::BTreeMap;

use vote_certainty::builder::SnapshotBuilder;

/// One result object, as published by the results backend.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResultsPayload {
    #[serde(rename = "serialeleicao")]
    pub serial: Option<JSValue>,
    #[serde(rename = "ativaeleicao")]
    pub active: bool,
    #[serde(rename = "totalpopulacao")]
    pub total_population: u64,
    #[serde(rename = "totalvotos")]
    pub total_votes: u64,
    #[serde(rename = "totalpossiveiseleitores")]
    pub total_possible_voters: Option<u64>,
    #[serde(rename = "votos_por_partido")]
    pub votes_by_party: Option<BTreeMap<String, u64>>,
}

impl ResultsPayload {
    /// The serial number of the election, which the backend sends either as a number or as a string.
    pub fn serial(&self) -> CheckResult<Option<String>> {
        match &self.serial {
            None | Some(JSValue::Null) => Ok(None),
            Some(JSValue::Number(n)) => Ok(Some(
                n.as_u64()
                    .map(|x| x.to_string())
                    .unwrap_or_else(|| n.to_string()),
            )),
            Some(JSValue::String(s)) => Ok(Some(s.clone())),
            Some(x) => ParsingSerialSnafu {
                value: x.to_string(),
            }
            .fail(),
        }
    }

    pub fn to_snapshot(&self, label: &str) -> CheckResult<TallySnapshot> {
        let mut builder = SnapshotBuilder::new()
            .active(self.active)
            .eligible(self.total_population)
            .cast(self.total_votes)
            .universe(self.total_possible_voters.unwrap_or(self.total_population));
        if let Some(votes) = &self.votes_by_party {
            for (name, count) in votes.iter() {
                builder = builder
                    .add_option(name, *count)
                    .context(InvalidOptionSnafu { label })?;
            }
        }
        Ok(builder.build())
    }
}

/// A result read from a file, with the label used to refer to it in the summary.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LabeledPayload {
    pub label: String,
    pub payload: ResultsPayload,
}

/// Reads a file containing either one result object or a list of them.
pub fn read_payloads(path: &str) -> CheckResult<Vec<LabeledPayload>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_payloads: read {} bytes from {:?}", contents.len(), path);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    parse_payloads(js, path)
}

pub fn parse_payloads(js: JSValue, path: &str) -> CheckResult<Vec<LabeledPayload>> {
    let default_label = make_default_label(path);
    let elements: Vec<JSValue> = match js {
        JSValue::Array(l) => l,
        x @ JSValue::Object(_) => vec![x],
        _ => whatever!("{}: expected a JSON object or a list of objects", path),
    };

    let mut res: Vec<LabeledPayload> = Vec::new();
    for (idx, elt) in elements.into_iter().enumerate() {
        let position_label = default_label(idx);
        let payload: ResultsPayload = serde_json::from_value(elt).context(ParsingPayloadSnafu {
            label: position_label.clone(),
        })?;
        let label = payload.serial()?.unwrap_or(position_label);
        debug!("parse_payloads: {}: {:?}", label, payload);
        res.push(LabeledPayload { label, payload });
    }
    info!("Read {} result(s) from {:?}", res.len(), path);
    Ok(res)
}
