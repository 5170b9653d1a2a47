// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cycle::{CycleType, RecurrenceRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub issuer: Option<String>,
    pub annual_fee: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benefit {
    pub id: i64,
    pub card_id: i64,
    pub title: String,
    /// Stored cycle-type string; may be a legacy alias or garbage, so it is
    /// only interpreted through `CycleType::parse`.
    pub cycle_type: String,
    pub is_personal_cycle: bool,
    pub custom_start_date: Option<NaiveDate>,
    pub end_month: Option<u32>,
    pub end_day: Option<u32>,
    /// Reimbursement cap for one cycle, if the benefit is capped.
    pub cap_amount: Option<Decimal>,
    pub reminder_days: u32,
    pub notifiable: bool,
    pub is_active: bool,
}

impl Benefit {
    pub fn rule(&self) -> RecurrenceRule {
        RecurrenceRule {
            cycle_type: CycleType::parse(&self.cycle_type),
            is_personal_cycle: self.is_personal_cycle,
            custom_start_date: self.custom_start_date,
            end_month: self.end_month,
            end_day: self.end_day,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub id: i64,
    pub benefit_id: i64,
    pub year: i32,
    pub cycle_number: Option<u32>,
    pub amount: Decimal,
    pub used_at: NaiveDate,
    pub note: Option<String>,
}
