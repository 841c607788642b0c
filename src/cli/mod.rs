//! CLI Module
//!
//! Command-line interface for inspecting and decoding audio files.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::backend::BackendKind;

/// audioload - decode audio files into channel-major sample matrices
#[derive(Parser, Debug)]
#[command(name = "audioload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Codec backend: auto, wav or probe
    #[arg(short, long, global = true, default_value = "auto")]
    pub backend: BackendKind,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the stream format without decoding samples
    #[command(name = "info")]
    Info {
        /// Audio file to inspect
        path: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode a file and print the resulting matrix
    #[command(name = "load")]
    Load {
        /// Audio file to decode
        path: PathBuf,

        /// Only print this channel
        #[arg(short, long)]
        channel: Option<usize>,

        /// Samples to print per channel
        #[arg(short, long, default_value_t = 8)]
        limit: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
