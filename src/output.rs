// Plain-text damage maps
//
// One `x y count` line per grid node, rows of constant y separated by a
// blank line. The node list runs one past the last bin on each axis with
// zero counts there, so the files close the grid for surface plots.

use crate::damage::DamageMaps;
use crate::data::element_symbol;
use crate::error::{BcaError, BcaResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Write one grid. `value(x, y)` is only asked for bins inside the grid.
pub fn write_grid<W, F>(
    out: &mut W,
    nx: usize,
    ny: usize,
    extents: [f64; 3],
    mut value: F,
) -> BcaResult<()>
where
    W: Write,
    F: FnMut(usize, usize) -> BcaResult<i64>,
{
    for y in 0..=ny {
        for x in 0..=nx {
            let x1 = x as f64 / nx as f64 * extents[0];
            let y1 = y as f64 / ny as f64 * extents[1];
            let count = if x < nx && y < ny { value(x, y)? } else { 0 };
            writeln!(out, "{:.6} {:.6} {}", x1, y1, count)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Fallback label for species `z` when none is configured.
pub fn species_label(z: u32) -> String {
    element_symbol(z)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Z{}", z))
}

/// Write `<basename>.<label>.{int,vac,net}` for every tracked species and
/// return the paths written. `labels` runs parallel to the species of
/// `maps`; an empty label falls back to [`species_label`].
pub fn write_damage_files(
    basename: &str,
    maps: &DamageMaps,
    extents: [f64; 3],
    labels: &[String],
) -> BcaResult<Vec<PathBuf>> {
    let (nx, ny, n_species) = maps.interstitials.dims();
    if labels.len() != n_species {
        return Err(BcaError::Config(format!(
            "{} labels for {} tracked species",
            labels.len(),
            n_species
        )));
    }
    let mut written = Vec::with_capacity(3 * n_species);

    for (index, &z) in maps.interstitials.species().iter().enumerate() {
        let label = match labels[index].as_str() {
            "" => species_label(z),
            label => label.to_string(),
        };
        let grids: [(&str, Box<dyn Fn(usize, usize) -> BcaResult<i64> + '_>); 3] = [
            (
                "int",
                Box::new(move |x, y| Ok(maps.interstitials.get(x, y, index)? as i64)),
            ),
            (
                "vac",
                Box::new(move |x, y| Ok(maps.vacancies.get(x, y, index)? as i64)),
            ),
            ("net", Box::new(move |x, y| maps.net(x, y, index))),
        ];
        for (suffix, value) in grids {
            let path = PathBuf::from(format!("{}.{}.{}", basename, label, suffix));
            let mut out = BufWriter::new(File::create(&path)?);
            write_grid(&mut out, nx, ny, extents, value)?;
            out.flush()?;
            written.push(path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_grid_layout() {
        let mut buffer = Vec::new();
        write_grid(&mut buffer, 2, 1, [10.0, 4.0, 100.0], |x, y| Ok((x + 10 * y) as i64 + 1)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let expected = "\
0.000000 0.000000 1
5.000000 0.000000 2
10.000000 0.000000 0

0.000000 4.000000 0
5.000000 4.000000 0
10.000000 4.000000 0

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_species_labels() {
        assert_eq!(species_label(29), "Cu");
        assert_eq!(species_label(47), "Ag");
        assert_eq!(species_label(200), "Z200");
    }

    #[test]
    fn test_write_damage_files() {
        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("wire");
        let basename = basename.to_str().unwrap();

        let mut maps = DamageMaps::new(20, 20, vec![29, 22, 47]).unwrap();
        maps.interstitials.increment(3, 4, 1).unwrap();
        maps.vacancies.increment(3, 4, 1).unwrap();
        maps.vacancies.increment(3, 4, 1).unwrap();

        let paths =
            write_damage_files(basename, &maps, [6.0, 6.0, 100.0], &labels(&["Cu", "Ti", "Ag"]))
                .unwrap();
        assert_eq!(paths.len(), 9);
        for symbol in ["Cu", "Ti", "Ag"] {
            for suffix in ["int", "vac", "net"] {
                assert!(dir.path().join(format!("wire.{}.{}", symbol, suffix)).exists());
            }
        }

        let net = std::fs::read_to_string(dir.path().join("wire.Ti.net")).unwrap();
        // 21 rows of 21 nodes, each row closed by a blank line
        assert_eq!(net.lines().count(), 21 * 22);
        assert!(net.contains("0.900000 1.200000 -1\n"));
        let vac = std::fs::read_to_string(dir.path().join("wire.Ti.vac")).unwrap();
        assert!(vac.contains("0.900000 1.200000 2\n"));
        let int = std::fs::read_to_string(dir.path().join("wire.Cu.int")).unwrap();
        assert!(int.lines().filter(|l| !l.is_empty()).all(|l| l.ends_with(" 0")));
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let maps = DamageMaps::new(2, 2, vec![29]).unwrap();
        let result = write_damage_files(
            "/nonexistent-dir/for/sure/run",
            &maps,
            [1.0, 1.0, 1.0],
            &labels(&["Cu"]),
        );
        assert!(matches!(result, Err(BcaError::Io(_))));
    }

    #[test]
    fn test_configured_labels_name_the_files() {
        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("w");
        let maps = DamageMaps::new(2, 2, vec![29, 47]).unwrap();

        let paths = write_damage_files(
            basename.to_str().unwrap(),
            &maps,
            [1.0, 1.0, 1.0],
            &labels(&["CuX", ""]),
        )
        .unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["w.CuX.int", "w.CuX.vac", "w.CuX.net", "w.Ag.int", "w.Ag.vac", "w.Ag.net"]
        );
    }

    #[test]
    fn test_label_count_must_match_species() {
        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("w");
        let maps = DamageMaps::new(2, 2, vec![29, 47]).unwrap();
        let result = write_damage_files(
            basename.to_str().unwrap(),
            &maps,
            [1.0, 1.0, 1.0],
            &labels(&["Cu"]),
        );
        assert!(matches!(result, Err(BcaError::Config(_))));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
