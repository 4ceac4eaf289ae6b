// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budget;
pub mod forecast;
pub mod reports;
pub mod importer;
pub mod exporter;
pub mod profiles;
pub mod settings;
pub mod cache;
pub mod doctor;
