// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

mod digest;
mod error;
mod mem_repository;
mod repository;

pub use digest::Digest;
pub use error::{Error, Result};
pub use mem_repository::MemRepository;
pub use repository::Repository;
