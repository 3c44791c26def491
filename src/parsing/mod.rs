//! Parsers for loading reference sequence into a pack.
//!
//! - **FASTA files**: plain or gzip/bgzip compressed, contigs concatenated in file order
//!
//! ## Example
//!
//! ```rust,no_run
//! use sv_view::parsing::fasta::load_pack;
//! use sv_view::store::Pack;
//! use std::path::Path;
//!
//! let pack = load_pack(Path::new("reference.fa.gz")).unwrap();
//! println!("{} contigs, {} bp", pack.contig_names().len(), pack.total_size());
//! ```

pub mod fasta;
