//! Selection rules: how a day's payload is drawn from a candidate pool.
//!
//! A rule decides how many items to pick, which candidates are eligible and
//! how randomness is applied. The random source is always passed in so
//! callers can seed it.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{de::DeserializeOwned, Serialize};

use crate::models::{Book, Quote, QuoteSource};

/// An item that can be referenced from a persisted payload.
pub trait Candidate {
    fn candidate_id(&self) -> &str;
}

impl Candidate for Book {
    fn candidate_id(&self) -> &str {
        &self.id
    }
}

impl Candidate for String {
    fn candidate_id(&self) -> &str {
        self
    }
}

pub trait SelectionRule<I> {
    type Payload: Serialize + DeserializeOwned + Send;

    /// Draw a payload from `pool`. `None` when no candidate is eligible.
    fn select(&self, pool: &[I], rng: &mut dyn RngCore) -> Option<Self::Payload>;

    /// Whether a previously persisted payload still fits `pool`. A payload
    /// that references items no longer present is regenerated.
    fn is_consistent(&self, _pool: &[I], _payload: &Self::Payload) -> bool {
        true
    }
}

/// Plain functions and closures are rules too.
impl<I, P, F> SelectionRule<I> for F
where
    F: Fn(&[I], &mut dyn RngCore) -> Option<P>,
    P: Serialize + DeserializeOwned + Send,
{
    type Payload = P;

    fn select(&self, pool: &[I], rng: &mut dyn RngCore) -> Option<P> {
        self(pool, rng)
    }
}

/// Pick one eligible item uniformly at random; the payload is its id.
#[derive(Debug, Clone)]
pub struct PickOne<F> {
    eligible: F,
}

impl<F> PickOne<F> {
    pub fn matching(eligible: F) -> Self {
        Self { eligible }
    }
}

impl PickOne<()> {
    pub fn any<I>() -> PickOne<fn(&I) -> bool> {
        PickOne {
            eligible: |_: &I| true,
        }
    }
}

impl<I, F> SelectionRule<I> for PickOne<F>
where
    I: Candidate,
    F: Fn(&I) -> bool,
{
    type Payload = String;

    fn select(&self, pool: &[I], rng: &mut dyn RngCore) -> Option<String> {
        let eligible: Vec<&I> = pool.iter().filter(|item| (self.eligible)(*item)).collect();
        eligible
            .choose(rng)
            .map(|item| item.candidate_id().to_string())
    }

    fn is_consistent(&self, pool: &[I], payload: &String) -> bool {
        pool.iter()
            .any(|item| item.candidate_id() == payload && (self.eligible)(item))
    }
}

/// Pick up to `count` distinct eligible items in random order. A pool with
/// fewer eligible items yields all of them.
#[derive(Debug, Clone)]
pub struct PickUpTo<F> {
    count: usize,
    eligible: F,
}

impl<F> PickUpTo<F> {
    pub fn new(count: usize, eligible: F) -> Self {
        Self { count, eligible }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<I, F> SelectionRule<I> for PickUpTo<F>
where
    I: Candidate,
    F: Fn(&I) -> bool,
{
    type Payload = Vec<String>;

    fn select(&self, pool: &[I], rng: &mut dyn RngCore) -> Option<Vec<String>> {
        let mut eligible: Vec<&I> = pool.iter().filter(|item| (self.eligible)(*item)).collect();
        if eligible.is_empty() || self.count == 0 {
            return None;
        }
        let take = self.count.min(eligible.len());
        let (picked, _) = eligible.partial_shuffle(rng, take);
        Some(
            picked
                .iter()
                .map(|item| item.candidate_id().to_string())
                .collect(),
        )
    }

    fn is_consistent(&self, pool: &[I], payload: &Vec<String>) -> bool {
        !payload.is_empty()
            && payload.len() <= self.count
            && payload.iter().all(|id| {
                pool.iter()
                    .any(|item| item.candidate_id() == id && (self.eligible)(item))
            })
    }
}

/// Quote of the day: the first insight of a random key point, across all
/// books that have one.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteOfDay;

impl SelectionRule<Book> for QuoteOfDay {
    type Payload = Quote;

    fn select(&self, pool: &[Book], rng: &mut dyn RngCore) -> Option<Quote> {
        let candidates: Vec<(&Book, usize, &String)> = pool
            .iter()
            .flat_map(|book| {
                book.key_points
                    .iter()
                    .enumerate()
                    .filter_map(move |(kp_index, kp)| {
                        kp.insights.first().map(|insight| (book, kp_index, insight))
                    })
            })
            .collect();

        candidates.choose(rng).map(|(book, kp_index, insight)| Quote {
            quote: (*insight).clone(),
            author: book.author.clone(),
            source: QuoteSource {
                book_id: book.id.clone(),
                key_point_index: *kp_index,
                insight_index: 0,
            },
        })
    }

    fn is_consistent(&self, pool: &[Book], payload: &Quote) -> bool {
        pool.iter()
            .find(|b| b.id == payload.source.book_id)
            .and_then(|b| b.key_points.get(payload.source.key_point_index))
            .and_then(|kp| kp.insights.get(payload.source.insight_index))
            .is_some_and(|insight| *insight == payload.quote)
    }
}
