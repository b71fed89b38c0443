// SPDX-License-Identifier: MPL-2.0
//! `meme_machine` turns an uploaded image into a captioned meme draft.
//!
//! It provides the upload, crop and caption-selection workflow as headless
//! state containers, the image pipeline behind cropping, and the caption
//! endpoint that asks a multimodal model for suggestions.

#![doc(html_root_url = "https://docs.rs/meme_machine/0.1.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod media;
pub mod service;
pub mod ui;

#[cfg(test)]
mod test_utils;
