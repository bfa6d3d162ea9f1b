use crate::factors::Rankings;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// 64-bit FNV-1a. Stable across processes, unlike `DefaultHasher`.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |state, &byte| {
        (state ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Stable hash of a full ranking, over its canonical bincode encoding.
pub fn fingerprint(rankings: &Rankings) -> bincode::Result<u64> {
    bincode::serialize(rankings).map(|bytes| fnv1a(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::Factor;
    use crate::vars::Var;

    #[test]
    fn known_fnv1a_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn fingerprint_tracks_amounts() {
        let mut rankings = Rankings::default();
        let empty = fingerprint(&rankings).unwrap();
        assert_eq!(empty, fingerprint(&rankings.clone()).unwrap());

        rankings.0.insert(
            Var::Water,
            vec![Factor::Event {
                name: "Drought".into(),
                amount: -2.,
                display: None,
            }],
        );
        assert_ne!(fingerprint(&rankings).unwrap(), empty);
    }
}
