//! Signed vote records for a demo poll.
//!
//! Every voter holds a STARK-curve key pair. A vote for option `v` in poll `id` is committed to as
//! `pedersen(id, v)` and signed with the voter's secret key; the resulting [VoteRecord]s are
//! collected together with the voters' public keys into a [VotingInput].

use alloc::vec::Vec;

use log::debug;
#[cfg(feature = "concurrent")]
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    dsa::ecdsa_stark::{KeyPair, Signature, SignatureError, verify_with_x},
    field::{FieldElement, Scalar},
    hash::Pedersen,
};


// CONSTANTS
// ================================================================================================

/// Identifier of the demo poll.
pub const DEMO_POLL_ID: u64 = 10018;

/// Number of voters in the demo.
pub const DEMO_VOTERS: usize = 10;

/// Private key of the first demo voter.
pub const DEMO_KEY_BASE: u64 = 654_321;

/// Difference between the private keys of consecutive demo voters.
pub const DEMO_KEY_STEP: u64 = 123_456;

/// Ballots cast in the demo, as `(voter_id, vote)` pairs.
pub const DEMO_BALLOTS: [Ballot; 3] =
    [Ballot::new(3, 0), Ballot::new(5, 1), Ballot::new(8, 0)];

// ERRORS
// ================================================================================================

/// Errors raised while assembling or checking signed votes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("voter {voter_id} does not exist, there are {voters} voters")]
    UnknownVoter { voter_id: usize, voters: usize },
    #[error("voter {voter_id} has the point at infinity as public key")]
    IdentityKey { voter_id: usize },
    #[error("failed to sign the vote of voter {voter_id}")]
    Signing {
        voter_id: usize,
        #[source]
        source: SignatureError,
    },
    #[error("signature of voter {voter_id} does not verify")]
    InvalidSignature { voter_id: usize },
    #[error("previous state has {actual} entries but there are {expected} voters")]
    PrevStateLength { expected: usize, actual: usize },
}

// KEY SCHEDULE
// ================================================================================================

/// Derives voter private keys as `step * voter_id + base`.
///
/// This is only suitable for demonstrations: every key is trivially predictable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySchedule {
    base: Scalar,
    step: Scalar,
}

impl KeySchedule {
    pub const fn new(base: Scalar, step: Scalar) -> Self {
        Self { base, step }
    }

    /// Returns the private key of the given voter.
    pub fn private_key(&self, voter_id: usize) -> Scalar {
        self.step * Scalar::from_u64(voter_id as u64) + self.base
    }

    /// Derives the key pairs of voters `0..voters`.
    pub fn key_pairs(&self, voters: usize) -> Vec<KeyPair> {
        (0..voters).map(|voter_id| KeyPair::derive(self.private_key(voter_id))).collect()
    }
}

impl Default for KeySchedule {
    fn default() -> Self {
        Self::new(Scalar::from_u64(DEMO_KEY_BASE), Scalar::from_u64(DEMO_KEY_STEP))
    }
}

// BALLOT
// ================================================================================================

/// A vote cast by a voter, before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ballot {
    pub voter_id: usize,
    pub vote: u64,
}

impl Ballot {
    pub const fn new(voter_id: usize, vote: u64) -> Self {
        Self { voter_id, vote }
    }
}

// VOTE RECORD
// ================================================================================================

/// A signed vote.
///
/// With the `serde` feature the signature components are serialized as `0x`-prefixed hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoteRecord {
    pub voter_id: usize,
    pub vote: u64,
    pub r: FieldElement,
    pub s: Scalar,
}

impl VoteRecord {
    pub fn signature(&self) -> Signature {
        Signature::new(self.r, self.s)
    }

    /// Returns `true` if the record is signed by the key with x-coordinate `public_x`.
    pub fn verify(&self, poll_id: FieldElement, public_x: FieldElement) -> bool {
        verify_with_x(vote_message(poll_id, self.vote), &self.signature(), public_x)
    }
}

/// Returns the message signed for `vote` in poll `poll_id`: `pedersen(poll_id, vote)`.
pub fn vote_message(poll_id: FieldElement, vote: u64) -> FieldElement {
    Pedersen::hash(poll_id, FieldElement::from_u64(vote))
}

/// Signs a single ballot with the voter's key pair.
///
/// # Errors
/// Returns [VoteError::Signing] if the signature cannot be produced.
pub fn sign_vote(
    poll_id: FieldElement,
    key_pair: &KeyPair,
    ballot: Ballot,
) -> Result<VoteRecord, VoteError> {
    let Ballot { voter_id, vote } = ballot;
    let signature = key_pair
        .sign(vote_message(poll_id, vote))
        .map_err(|source| VoteError::Signing { voter_id, source })?;
    debug!("signed vote {vote} of voter {voter_id}");

    Ok(VoteRecord { voter_id, vote, r: signature.r(), s: signature.s() })
}

/// Signs a batch of ballots, preserving their order.
///
/// With the `concurrent` feature the ballots are signed in parallel.
///
/// # Errors
/// Returns an error if a ballot refers to a voter outside `key_pairs`, or if signing fails.
pub fn sign_votes(
    poll_id: FieldElement,
    key_pairs: &[KeyPair],
    ballots: &[Ballot],
) -> Result<Vec<VoteRecord>, VoteError> {
    let sign = |ballot: &Ballot| {
        let key_pair = key_pairs.get(ballot.voter_id).ok_or(VoteError::UnknownVoter {
            voter_id: ballot.voter_id,
            voters: key_pairs.len(),
        })?;
        sign_vote(poll_id, key_pair, *ballot)
    };

    #[cfg(feature = "concurrent")]
    let records = ballots.par_iter().map(sign).collect();
    #[cfg(not(feature = "concurrent"))]
    let records = ballots.iter().map(sign).collect();

    records
}

// VOTING INPUT
// ================================================================================================

/// Public keys of all voters together with the signed votes.
///
/// `prev_state`, when present, holds the previous vote of every voter and is passed through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VotingInput {
    pub public_keys: Vec<FieldElement>,
    pub votes: Vec<VoteRecord>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub prev_state: Option<Vec<u64>>,
}

impl VotingInput {
    /// Derives the keys of `voters` voters from `schedule` and signs `ballots` with them.
    ///
    /// # Errors
    /// Returns an error if:
    /// - a voter's public key is the point at infinity;
    /// - a ballot refers to an unknown voter or cannot be signed;
    /// - `prev_state` is given and does not have one entry per voter.
    pub fn build(
        poll_id: FieldElement,
        schedule: &KeySchedule,
        voters: usize,
        ballots: &[Ballot],
        prev_state: Option<Vec<u64>>,
    ) -> Result<Self, VoteError> {
        if let Some(state) = &prev_state
            && state.len() != voters
        {
            return Err(VoteError::PrevStateLength { expected: voters, actual: state.len() });
        }

        let key_pairs = schedule.key_pairs(voters);
        debug!("derived {voters} voter keys");

        let public_keys = key_pairs
            .iter()
            .enumerate()
            .map(|(voter_id, key_pair)| {
                key_pair.public_key().x().ok_or(VoteError::IdentityKey { voter_id })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let votes = sign_votes(poll_id, &key_pairs, ballots)?;

        Ok(Self { public_keys, votes, prev_state })
    }

    /// Builds the demo input: ten voters with the demo key schedule and the demo ballots.
    ///
    /// # Errors
    /// Never fails for the demo parameters; the signature mirrors [VotingInput::build].
    pub fn demo() -> Result<Self, VoteError> {
        Self::build(
            FieldElement::from_u64(DEMO_POLL_ID),
            &KeySchedule::default(),
            DEMO_VOTERS,
            &DEMO_BALLOTS,
            None,
        )
    }

    /// Checks every vote against the public key of its voter.
    ///
    /// # Errors
    /// Returns the first voter whose id is unknown or whose signature does not verify.
    pub fn verify(&self, poll_id: FieldElement) -> Result<(), VoteError> {
        for record in &self.votes {
            let voter_id = record.voter_id;
            let public_x = self.public_keys.get(voter_id).ok_or(VoteError::UnknownVoter {
                voter_id,
                voters: self.public_keys.len(),
            })?;
            if !record.verify(poll_id, *public_x) {
                return Err(VoteError::InvalidSignature { voter_id });
            }
        }
        Ok(())
    }
}
