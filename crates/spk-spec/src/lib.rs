// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

mod build_spec;
mod error;
mod install_spec;
mod option;
mod requirements_list;
mod source_spec;
mod spec;
mod test_spec;

pub use build_spec::BuildSpec;
pub use error::{Error, Result};
pub use install_spec::InstallSpec;
pub use option::{Inheritance, Opt, PkgOpt, VarOpt};
pub use requirements_list::RequirementsList;
pub use source_spec::{GitSource, LocalSource, SourceSpec, TarSource};
pub use spec::Spec;
pub use test_spec::{TestSpec, TestStage};
