// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod benefits;
pub mod cards;
pub mod doctor;
pub mod exporter;
pub mod remind;
pub mod upcoming;
pub mod usage;
