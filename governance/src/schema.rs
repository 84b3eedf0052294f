//! Wire formats of the vote hub and the activation service, and the parse
//! step that turns them into domain types.
//!
//! Every function here either returns fully-formed domain values or a
//! [`ValidationError`] naming what was wrong. Nothing downstream looks at raw
//! JSON.

use govdash_types::{ProposalId, Timestamp, ValidationError, WalletAddress};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::proposal::{ActivationRecord, ActivationStatus, SnapshotProposal, SpaceConfig, Vote};

// ── Hub: proposals ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawProposal {
    msg: RawProposalMsg,
}

#[derive(Deserialize)]
struct RawProposalMsg {
    payload: RawProposalPayload,
}

#[derive(Deserialize)]
struct RawProposalPayload {
    name: String,
    #[serde(default)]
    body: String,
    start: u64,
    end: u64,
    choices: Vec<String>,
}

/// Parse the hub's `{ id: proposal }` map.
///
/// Only the shape is checked. The map also carries non-governance traffic, so
/// odd values (an inverted window, no choices) are kept as reported and left
/// to the exclusion and naming passes; such a proposal is never active and
/// matches no vote label.
pub fn parse_proposals(json: Value) -> Result<BTreeMap<ProposalId, SnapshotProposal>, ValidationError> {
    let raw: BTreeMap<String, RawProposal> =
        serde_json::from_value(json).map_err(|e| ValidationError::malformed("proposal list", e))?;

    Ok(raw
        .into_iter()
        .map(|(id, proposal)| {
            let payload = proposal.msg.payload;
            let id = ProposalId::new(id);
            (
                id.clone(),
                SnapshotProposal {
                    id,
                    name: payload.name,
                    body: payload.body,
                    start: Timestamp::new(payload.start),
                    end: Timestamp::new(payload.end),
                    choices: payload.choices,
                },
            )
        })
        .collect())
}

// ── Hub: space ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawSpace {
    #[serde(default)]
    filters: RawSpaceFilters,
}

#[derive(Deserialize, Default)]
struct RawSpaceFilters {
    #[serde(default)]
    invalids: Vec<String>,
}

/// Parse a space document. A space without filters excludes nothing.
pub fn parse_space(json: Value) -> Result<SpaceConfig, ValidationError> {
    let raw: RawSpace =
        serde_json::from_value(json).map_err(|e| ValidationError::malformed("space", e))?;
    Ok(SpaceConfig {
        invalids: raw.filters.invalids.into_iter().map(ProposalId::new).collect(),
    })
}

// ── Hub: votes ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawVote {
    #[serde(default)]
    address: Option<String>,
    msg: RawVoteMsg,
}

#[derive(Deserialize)]
struct RawVoteMsg {
    payload: RawVotePayload,
}

#[derive(Deserialize)]
struct RawVotePayload {
    choice: u32,
    proposal: String,
}

/// Parse the hub's `{ voter: vote }` map for one proposal.
///
/// The voter is taken from the vote record, falling back to the map key. A
/// choice outside `1..=choices.len()` is kept; it simply matches no label.
pub fn parse_votes(json: Value) -> Result<Vec<Vote>, ValidationError> {
    let raw: BTreeMap<String, RawVote> =
        serde_json::from_value(json).map_err(|e| ValidationError::malformed("vote list", e))?;

    Ok(raw
        .into_iter()
        .map(|(key, vote)| Vote {
            voter: WalletAddress::new(vote.address.unwrap_or(key)),
            proposal_id: ProposalId::new(vote.msg.payload.proposal),
            choice: vote.msg.payload.choice,
        })
        .collect())
}

// ── Activation service ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivation {
    proposal_id: String,
    status: ActivationStatus,
    #[serde(default)]
    yes_points: f64,
    #[serde(default)]
    no_points: f64,
}

/// Parse the activation service's record array, keyed by proposal id.
/// A later record for the same id replaces an earlier one.
pub fn parse_activations(json: Value) -> Result<HashMap<ProposalId, ActivationRecord>, ValidationError> {
    let raw: Vec<RawActivation> = serde_json::from_value(json)
        .map_err(|e| ValidationError::malformed("activation list", e))?;

    Ok(raw
        .into_iter()
        .map(|r| {
            let id = ProposalId::new(r.proposal_id);
            (
                id.clone(),
                ActivationRecord {
                    proposal_id: id,
                    status: r.status,
                    yes_points: r.yes_points,
                    no_points: r.no_points,
                },
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn proposal_json(name: &str, start: u64, end: u64) -> Value {
        json!({
            "address": "0x1111111111111111111111111111111111111111",
            "sig": "0xsig",
            "authorIpfsHash": "ignored",
            "msg": {
                "version": "0.1.3",
                "timestamp": "1600000000",
                "type": "proposal",
                "payload": {
                    "name": name,
                    "body": "see https://community.airswap.io/t/aip-1",
                    "start": start,
                    "end": end,
                    "choices": ["Yes", "No"],
                }
            }
        })
    }

    #[test]
    fn parses_hub_proposals_keyed_by_id() {
        let json = json!({
            "QmB": proposal_json("AIP-2", 10, 20),
            "QmA": proposal_json("AIP-1", 5, 15),
        });
        let parsed = parse_proposals(json).unwrap();
        let ids: Vec<&str> = parsed.keys().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["QmA", "QmB"]);
        let a = &parsed[&ProposalId::new("QmA")];
        assert_eq!(a.id.as_str(), "QmA");
        assert_eq!(a.name, "AIP-1");
        assert_eq!(a.start, Timestamp::new(5));
        assert_eq!(a.choices, ["Yes", "No"]);
    }

    #[test]
    fn odd_records_do_not_sink_the_list() {
        let mut no_choices = proposal_json("Random forum post", 0, 100);
        no_choices["msg"]["payload"]["choices"] = json!([]);
        let json = json!({
            "Qm1": proposal_json("AIP-1", 0, 100),
            "QmInverted": proposal_json("Random forum post", 200, 100),
            "QmEmpty": no_choices,
        });

        let parsed = parse_proposals(json).unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[&ProposalId::new("Qm1")].name, "AIP-1");
        let inverted = &parsed[&ProposalId::new("QmInverted")];
        assert_eq!((inverted.start, inverted.end), (Timestamp::new(200), Timestamp::new(100)));
        assert!(parsed[&ProposalId::new("QmEmpty")].choices.is_empty());
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(parse_proposals(json!([])).is_err());
        assert!(parse_proposals(json!({ "Qm": { "msg": {} } })).is_err());
        assert!(parse_space(json!("nope")).is_err());
        assert!(parse_votes(json!({ "0xa": { "msg": { "payload": { "choice": "yes", "proposal": "Qm" } } } })).is_err());
        assert!(parse_activations(json!({ "proposalId": "Qm" })).is_err());
    }

    #[test]
    fn space_filters_default_to_empty() {
        assert!(parse_space(json!({ "name": "vote" })).unwrap().invalids.is_empty());
        let space = parse_space(json!({ "filters": { "minScore": 1, "invalids": ["QmX"] } })).unwrap();
        assert!(space.invalids.contains(&ProposalId::new("QmX")));
    }

    #[test]
    fn votes_take_address_from_record() {
        let json = json!({
            "0xAAA": { "address": "0xAbC", "msg": { "payload": { "choice": 1, "proposal": "Qm" } } },
            "0xdef": { "msg": { "payload": { "choice": 2, "proposal": "Qm" } } },
        });
        let votes = parse_votes(json).unwrap();
        assert_eq!(votes[0].voter, WalletAddress::new("0xabc"));
        assert_eq!(votes[1].voter, WalletAddress::new("0xdef"));
        assert_eq!(votes[1].choice, 2);
    }

    #[test]
    fn zero_choice_is_kept() {
        let json = json!({
            "0xa": { "msg": { "payload": { "choice": 0, "proposal": "Qm" } } },
            "0xb": { "msg": { "payload": { "choice": 1, "proposal": "Qm" } } },
        });
        let votes = parse_votes(json).unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].choice, 0);
    }

    #[test]
    fn parses_activation_records() {
        let json = json!([
            { "proposalId": "Qm1", "status": "ACCEPTED", "yesPoints": 1200.5, "noPoints": 30 },
            { "proposalId": "Qm2", "status": "NOT_STARTED" },
        ]);
        let records = parse_activations(json).unwrap();
        let first = &records[&ProposalId::new("Qm1")];
        assert_eq!(first.status, ActivationStatus::Accepted);
        assert_eq!(first.yes_points, 1200.5);
        assert_eq!(first.no_points, 30.0);
        assert_eq!(records[&ProposalId::new("Qm2")].yes_points, 0.0);
        assert!(parse_activations(json!([{ "proposalId": "Qm", "status": "MAYBE" }])).is_err());
    }
}
