//! Production line parameters.
//!
//! # Cycle Time
//! `cycle_time = available_time / demand`: the longest a station may spend
//! on one unit if the line is to meet demand.
//!
//! # Theoretical Minimum
//! `min_stations = ceil(total_task_time / cycle_time)`

use serde::Serialize;

use crate::error::{BalanceError, Result};

/// Demand and time budget of a production line.
///
/// The cycle time is always derived from these two values and never
/// stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineParameters {
    demand: u32,
    available_time: f64,
}

impl LineParameters {
    /// Creates validated line parameters.
    ///
    /// # Errors
    /// [`BalanceError::Configuration`] if `demand` is zero or
    /// `available_time` is not a positive finite number.
    pub fn new(demand: u32, available_time: f64) -> Result<Self> {
        if demand == 0 {
            return Err(BalanceError::Configuration(
                "daily demand must be greater than zero".to_string(),
            ));
        }
        if !available_time.is_finite() || available_time <= 0.0 {
            return Err(BalanceError::Configuration(format!(
                "available time must be a positive number (got {available_time})"
            )));
        }
        Ok(Self {
            demand,
            available_time,
        })
    }

    /// Units required per period.
    pub fn demand(&self) -> u32 {
        self.demand
    }

    /// Productive time available per period.
    pub fn available_time(&self) -> f64 {
        self.available_time
    }

    /// Time budget per station per unit.
    pub fn cycle_time(&self) -> f64 {
        self.available_time / f64::from(self.demand)
    }

    /// Theoretical minimum number of stations for `total_task_time`.
    pub fn min_stations(&self, total_task_time: f64) -> usize {
        let ratio = total_task_time / self.cycle_time();
        if ratio <= 0.0 {
            0
        } else {
            ratio.ceil() as usize
        }
    }
}
