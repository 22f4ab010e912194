use bp_cards::Street;

/// Conventional on-disk filename for a postflop cluster table, grounded on
/// `examples/original_source/pluribus/cluster.hpp`'s
/// `cluster_filename(round, n_clusters, split)`.
///
/// `split` distinguishes independently-trained table variants (e.g. a
/// held-out validation split); callers that don't train multiple variants
/// pass `0`.
pub fn cluster_filename(street: Street, n_clusters: usize, split: u32) -> String {
    format!("{street}_{n_clusters}_{split}.dat")
}

/// Reads a cluster table as a flat sequence of little-endian `u16` values,
/// one per isomorphism index.
pub fn load_table(path: &std::path::Path) -> std::io::Result<Vec<u16>> {
    let bytes = std::fs::read(path)?;
    if bytes.len() % 2 != 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} has an odd byte length, not a u16 table", path.display()),
        ));
    }
    Ok(bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The filename encodes street, cluster count, and split.
    #[test]
    fn filename_format() {
        assert_eq!(cluster_filename(Street::Flop, 200, 0), "flop_200_0.dat");
        assert_eq!(cluster_filename(Street::River, 200, 3), "river_200_3.dat");
    }

    /// Round-tripping a table through a temp file preserves every entry.
    #[test]
    fn table_round_trips() {
        let dir = std::env::temp_dir().join(format!("bp-clustering-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("table.dat");
        let values: Vec<u16> = vec![0, 1, 199, 42, 65535];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        std::fs::write(&path, &bytes).unwrap();
        assert_eq!(load_table(&path).unwrap(), values);
        std::fs::remove_dir_all(&dir).ok();
    }
}
