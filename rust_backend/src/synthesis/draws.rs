//! Seeded random source with a fixed draw order.
//!
//! The generator must consume random numbers in exactly this order:
//!
//! 1. catalog prices
//! 2. transaction dates
//! 3. product selection
//! 4. daily sales totals
//! 5. anomaly date selection
//! 6. anomaly multipliers
//!
//! [`DrawSequence`] carries its current stage as a type parameter. Each stage
//! has a single drawing method that consumes the handle and returns the
//! handle for the next stage, so drawing out of order does not compile.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use std::marker::PhantomData;

use crate::core::catalog::{round_price, PRODUCT_COUNT};

/// Stage 1: catalog prices.
#[derive(Debug)]
pub struct Prices;
/// Stage 2: transaction dates.
#[derive(Debug)]
pub struct Dates;
/// Stage 3: product selection.
#[derive(Debug)]
pub struct Products;
/// Stage 4: daily sales totals.
#[derive(Debug)]
pub struct Totals;
/// Stage 5: anomaly date selection.
#[derive(Debug)]
pub struct AnomalyDates;
/// Stage 6: anomaly multipliers.
#[derive(Debug)]
pub struct AnomalyFactors;
/// All draws consumed.
#[derive(Debug)]
pub struct Done;

/// Random source positioned at stage `S`.
#[derive(Debug)]
pub struct DrawSequence<S> {
    rng: StdRng,
    _stage: PhantomData<S>,
}

impl<S> DrawSequence<S> {
    fn advance<T>(self) -> DrawSequence<T> {
        DrawSequence {
            rng: self.rng,
            _stage: PhantomData,
        }
    }
}

impl DrawSequence<Prices> {
    /// Seed a fresh sequence. Nothing may be drawn before this.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            _stage: PhantomData,
        }
    }

    /// One price per product id `1..=PRODUCT_COUNT`, uniform in `[low, high)`,
    /// rounded to cents.
    pub fn catalog_prices(mut self, range: (f64, f64)) -> (Vec<f64>, DrawSequence<Dates>) {
        let (low, high) = range;
        let prices = (0..PRODUCT_COUNT)
            .map(|_| round_price(self.rng.gen_range(low..high)))
            .collect();
        (prices, self.advance())
    }
}

impl DrawSequence<Dates> {
    /// `count` dates drawn independently and uniformly from
    /// `anchor - window_days ..= anchor`. Dates repeat and are unordered.
    pub fn transaction_dates(
        mut self,
        count: usize,
        anchor: NaiveDate,
        window_days: u32,
    ) -> (Vec<NaiveDate>, DrawSequence<Products>) {
        let start = anchor - Duration::days(i64::from(window_days));
        let dates = (0..count)
            .map(|_| start + Duration::days(self.rng.gen_range(0..=i64::from(window_days))))
            .collect();
        (dates, self.advance())
    }
}

impl DrawSequence<Products> {
    /// `count` product ids drawn uniformly with replacement from `product_ids`.
    ///
    /// Returns an empty selection when `product_ids` is empty.
    pub fn product_selection(
        mut self,
        count: usize,
        product_ids: &[u32],
    ) -> (Vec<u32>, DrawSequence<Totals>) {
        let selection = if product_ids.is_empty() {
            Vec::new()
        } else {
            (0..count)
                .map(|_| product_ids[self.rng.gen_range(0..product_ids.len())])
                .collect()
        };
        (selection, self.advance())
    }
}

impl DrawSequence<Totals> {
    /// `count` totals uniform in `[low, high)`, one per distinct date in
    /// ascending date order.
    pub fn daily_totals(
        mut self,
        count: usize,
        range: (f64, f64),
    ) -> (Vec<f64>, DrawSequence<AnomalyDates>) {
        let (low, high) = range;
        let totals = (0..count).map(|_| self.rng.gen_range(low..high)).collect();
        (totals, self.advance())
    }
}

impl DrawSequence<AnomalyDates> {
    /// Sample `amount` positions out of `len` without replacement.
    ///
    /// `amount` is clamped to `len`.
    pub fn anomaly_positions(
        mut self,
        len: usize,
        amount: usize,
    ) -> (Vec<usize>, DrawSequence<AnomalyFactors>) {
        let amount = amount.min(len);
        let positions = index::sample(&mut self.rng, len, amount).into_vec();
        (positions, self.advance())
    }
}

impl DrawSequence<AnomalyFactors> {
    /// One multiplier per anomaly date, chosen uniformly from `factors`.
    pub fn anomaly_factors(mut self, count: usize, factors: &[f64]) -> (Vec<f64>, DrawSequence<Done>) {
        let drawn = (0..count)
            .filter_map(|_| factors.choose(&mut self.rng).copied())
            .collect();
        (drawn, self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_in_range_and_rounded() {
        let (prices, _) = DrawSequence::seeded(42).catalog_prices((5000.0, 20000.0));
        assert_eq!(prices.len(), PRODUCT_COUNT as usize);
        for price in prices {
            assert!((5000.0..=20000.0).contains(&price));
            assert_eq!(round_price(price), price);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let run = || {
            let (prices, draws) = DrawSequence::seeded(7).catalog_prices((5000.0, 20000.0));
            let (dates, _) = draws.transaction_dates(50, anchor, 180);
            (prices, dates)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_dates_within_window() {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let (_, draws) = DrawSequence::seeded(1).catalog_prices((1.0, 2.0));
        let (dates, _) = draws.transaction_dates(500, anchor, 10);
        let start = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        assert!(dates.iter().all(|d| *d >= start && *d <= anchor));
    }

    #[test]
    fn test_anomaly_positions_unique_and_clamped() {
        let (_, draws) = DrawSequence::seeded(3).catalog_prices((1.0, 2.0));
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let (_, draws) = draws.transaction_dates(0, anchor, 0);
        let (_, draws) = draws.product_selection(0, &[1]);
        let (_, draws) = draws.daily_totals(0, (1.0, 2.0));
        let (positions, draws) = draws.anomaly_positions(4, 10);

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);

        let (factors, _) = draws.anomaly_factors(positions.len(), &[2.0, 3.0]);
        assert_eq!(factors.len(), 4);
        assert!(factors.iter().all(|f| *f == 2.0 || *f == 3.0));
    }
}
