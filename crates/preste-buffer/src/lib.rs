//! preste-buffer — substrat mémoire du runtime de sérialisation Preste
//!
//! Fournit :
//! - [`MemBuffer`] : buffer adressable par octet, double mode heap/off-heap,
//!   curseurs de lecture/écriture indépendants, croissance transparente
//! - Primitives random-access LE/natives, formes `*_unchecked` pour les
//!   chemins chauds générés
//! - Codecs varint du format de fil : varint positif, zig-zag, varint aligné
//!   4 octets, var-long, SLI long
//! - [`NativeRegion`] / [`RegionView`] : régions directes épinglées et vues
//!   exportées
//! - Erreurs [`BufferError`] + alias [`BufferResult<T>`]
//!
//! Features :
//! - `bounds-checks` (par défaut) : valide les accès indexés ; désactivée,
//!   le chemin vérifié compile vers zéro instruction
//! - `tracing` : événements debug sur allocation et promotion off-heap → heap
//!
//! Un buffer est une valeur à propriétaire unique : aucun accès concurrent à
//! une même instance. L'aliasing d'octets passe exclusivement par `slice`,
//! `clone_reference` et `region_view`, et une croissance ne se propage jamais
//! aux alias.

#![deny(missing_docs)]

/* ─────────────────────────── Modules publics ─────────────────────────── */

/// Erreurs communes du substrat buffer.
pub mod error;

/// Régions mémoire directes et vues exportées.
pub mod region;

mod buffer;

pub use buffer::MemBuffer;
pub use error::{BufferError, BufferResult};
pub use region::{NativeRegion, RegionView};

/* ─────────────────────────── Constantes process ─────────────────────────── */

/// True when the host stores integers little-endian.
///
/// Fixed at compile time; the little-endian wire forms byte-swap only when
/// this is false.
pub const HOST_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// True when checked accessors validate their ranges.
///
/// Driven by the `bounds-checks` cargo feature; the `*_unchecked` surface
/// never consults it.
pub const BOUNDS_CHECKS: bool = cfg!(feature = "bounds-checks");

/* ─────────────────────────── Prélude (reexports utiles) ─────────────────────────── */

/// Prélude pratique pour importer les types clés du crate.
pub mod prelude {
    /// Réexports utiles pour une importation rapide.
    pub use super::{
        BufferError, BufferResult, MemBuffer, NativeRegion, RegionView, BOUNDS_CHECKS,
        HOST_LITTLE_ENDIAN,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endianness_constant_matches_target() {
        assert_eq!(HOST_LITTLE_ENDIAN, cfg!(target_endian = "little"));
    }

    #[test]
    fn prelude_exposes_buffer() {
        let buf = crate::prelude::MemBuffer::allocate(4);
        assert_eq!(buf.size(), 4);
    }
}
