//! Route codec: the compact hop-instruction stream.
//!
//! ## Components
//!
//! - [`RouteCursor`]: Bounds-checked reader
//! - [`decode_next`]: Decodes one hop and moves the ledger's pointers
//! - [`RouteBuilder`]: Encoder for the same layout
//!
//! ## Layout
//!
//! | Field | Size | Condition |
//! |---|---|---|
//! | share (bps) | 2 | always |
//! | case code | 1 | always |
//! | sell asset | 20 | case 3 |
//! | buy asset | 20 | cases 1, 2, 3 |
//! | pool fee | 3 | always |
//! | tick spacing | 3 | always |
//! | hook identity | 20 | always |
//! | hook payload length | 3 | always |
//! | hook payload | variable | per length |

pub mod builder;
pub mod cursor;
pub mod decoder;

pub use builder::RouteBuilder;
pub use cursor::RouteCursor;
pub use decoder::decode_next;
