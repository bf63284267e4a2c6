// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every query converts rows back into domain values before returning them.

pub mod assignments;
pub mod calendar;
pub mod people;
