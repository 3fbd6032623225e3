// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod budgets;
pub mod habits;
pub mod calendar;
pub mod insights;
pub mod exporter;
pub mod settings;
pub mod doctor;
pub mod rules;
