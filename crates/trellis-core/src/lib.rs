//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational record types for trellis association
//! networks. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Matrices**: Labeled association matrices with missing cells ([`matrix::Matrix`])
//! - **Datasets**: A matrix plus its measurement metadata ([`dataset::Dataset`])
//! - **Edges**: Extracted, weighted edge records ([`edge`] module)
//! - **Positions**: Laid-out node coordinates ([`position::NodePosition`])
//! - **Warnings**: Non-fatal consistency conditions ([`warning::ConsistencyWarning`])

pub mod dataset;
pub mod edge;
pub mod identifier;
pub mod matrix;
pub mod position;
pub mod warning;
