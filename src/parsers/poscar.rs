//! # VASP POSCAR 格式解析器
//!
//! 解析 VASP POSCAR/CONTCAR 文件为笛卡尔坐标的 `Atoms`。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor (负值表示目标体积)
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! VASP 4 格式没有元素行，此时尝试从注释行读取元素符号。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`、`models/elements.rs`

use crate::error::{EmPlotError, Result};
use crate::models::{elements, Atoms, Lattice};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Atoms> {
    if !path.exists() {
        return Err(EmPlotError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| EmPlotError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(
        &content,
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

fn parse_error(source: &str, reason: impl Into<String>) -> EmPlotError {
    EmPlotError::ParseError {
        format: "poscar".to_string(),
        path: source.to_string(),
        reason: reason.into(),
    }
}

/// 元素符号转原子序数
fn symbols_to_numbers(symbols: &[&str], source: &str) -> Result<Vec<usize>> {
    symbols
        .iter()
        .map(|s| {
            elements::atomic_number(s)
                .ok_or_else(|| parse_error(source, format!("Unknown element symbol '{}'", s)))
        })
        .collect()
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, source: &str) -> Result<Atoms> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 7 {
        return Err(parse_error(source, "File too short"));
    }

    // Line 0: Comment/name
    let comment = lines[0].trim();
    let name = if comment.is_empty() { source } else { comment };

    // Line 1: Scaling factor
    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_error(source, "Invalid scaling factor at line 2"))?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .take(3)
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(parse_error(
                source,
                format!("Invalid lattice vector at line {}", 3 + i),
            ));
        }
        row.copy_from_slice(&parts);
    }

    let raw_volume = Lattice::from_vectors(matrix).volume().abs();
    let factor = if scale < 0.0 {
        if raw_volume < 1e-12 {
            return Err(parse_error(source, "Degenerate lattice with volume scaling"));
        }
        (-scale / raw_volume).cbrt()
    } else {
        scale
    };
    for row in matrix.iter_mut() {
        for v in row.iter_mut() {
            *v *= factor;
        }
    }
    let lattice = Lattice::from_vectors(matrix);

    // Line 5: Element symbols (VASP 5+) or atom counts (VASP 4)
    let line5: Vec<&str> = lines[5].split_whitespace().collect();
    if line5.is_empty() {
        return Err(parse_error(source, "Missing species line"));
    }

    let (species, counts, atom_line_start) = if line5[0].parse::<usize>().is_ok() {
        let counts: Vec<usize> = line5.iter().filter_map(|s| s.parse().ok()).collect();
        let guessed: Vec<&str> = comment.split_whitespace().take(counts.len()).collect();
        let species = if guessed.len() == counts.len() {
            symbols_to_numbers(&guessed, source).unwrap_or_else(|_| vec![0; counts.len()])
        } else {
            vec![0; counts.len()]
        };
        (species, counts, 6)
    } else {
        let counts: Vec<usize> = lines[6]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        (symbols_to_numbers(&line5, source)?, counts, 7)
    };

    if species.len() != counts.len() {
        return Err(parse_error(
            source,
            format!(
                "{} element symbols but {} atom counts",
                species.len(),
                counts.len()
            ),
        ));
    }

    // Check for "Selective dynamics" line
    let mut coord_line = atom_line_start;
    if lines
        .get(coord_line)
        .is_some_and(|l| l.trim().to_lowercase().starts_with('s'))
    {
        coord_line += 1;
    }

    let coord_type = lines
        .get(coord_line)
        .map(|l| l.trim().to_lowercase())
        .ok_or_else(|| parse_error(source, "Missing coordinate type line"))?;
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    // Parse atom positions
    let total: usize = counts.iter().sum();
    let mut numbers = Vec::with_capacity(total);
    let mut positions = Vec::with_capacity(total);
    let mut line_idx = coord_line + 1;

    for (&z, &count) in species.iter().zip(counts.iter()) {
        for _ in 0..count {
            let parts: Vec<f64> = lines
                .get(line_idx)
                .ok_or_else(|| {
                    parse_error(source, format!("Expected {} atoms, file ended early", total))
                })?
                .split_whitespace()
                .take(3)
                .filter_map(|s| s.parse().ok())
                .collect();

            if parts.len() < 3 {
                return Err(parse_error(
                    source,
                    format!("Invalid atom position at line {}", line_idx + 1),
                ));
            }

            let position = [parts[0], parts[1], parts[2]];
            positions.push(if is_cartesian {
                [
                    position[0] * factor,
                    position[1] * factor,
                    position[2] * factor,
                ]
            } else {
                lattice.to_cartesian(position)
            });
            numbers.push(z);
            line_idx += 1;
        }
    }

    Atoms::new(name, lattice, numbers, positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_poscar_vasp5() {
        let content = r#"NaCl
1.0
5.64 0.0 0.0
0.0 5.64 0.0
0.0 0.0 5.64
Na Cl
4 4
Direct
0.0 0.0 0.0
0.5 0.5 0.0
0.5 0.0 0.5
0.0 0.5 0.5
0.5 0.0 0.0
0.0 0.5 0.0
0.0 0.0 0.5
0.5 0.5 0.5
"#;
        let atoms = parse_poscar_content(content, "POSCAR").unwrap();
        assert_eq!(atoms.name, "NaCl");
        assert_eq!(atoms.len(), 8);
        assert_eq!(atoms.numbers.iter().filter(|&&z| z == 11).count(), 4);
        assert_eq!(atoms.numbers.iter().filter(|&&z| z == 17).count(), 4);
        assert_eq!(atoms.positions[1], [2.82, 2.82, 0.0]);
    }

    #[test]
    fn test_parse_poscar_with_scale() {
        let content = r#"Si
2.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Si
2
Direct
0.0 0.0 0.0
0.5 0.5 0.5
"#;
        let atoms = parse_poscar_content(content, "Si").unwrap();
        assert!((atoms.lattice.lengths()[0] - 4.0).abs() < 1e-12);
        assert_eq!(atoms.positions[1], [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_parse_poscar_negative_scale_is_volume() {
        let content = r#"cell
-64.0
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
Cu
1
Cartesian
0.5 0.5 0.5
"#;
        let atoms = parse_poscar_content(content, "Cu").unwrap();
        assert!((atoms.lattice.volume() - 64.0).abs() < 1e-9);
        assert!((atoms.positions[0][0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_poscar_selective_dynamics_cartesian() {
        let content = r#"Fe with selective
1.0
2.87 0.0 0.0
0.0 2.87 0.0
0.0 0.0 2.87
Fe
2
Selective dynamics
Cartesian
0.0 0.0 0.0 T T T
1.435 1.435 1.435 F F F
"#;
        let atoms = parse_poscar_content(content, "Fe").unwrap();
        assert_eq!(atoms.numbers, vec![26, 26]);
        assert_eq!(atoms.positions[1], [1.435, 1.435, 1.435]);
    }

    #[test]
    fn test_parse_poscar_vasp4_uses_comment_symbols() {
        let content = r#"Ga As
5.65
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
1 1
Direct
0.0 0.0 0.0
0.25 0.25 0.25
"#;
        let atoms = parse_poscar_content(content, "GaAs").unwrap();
        assert_eq!(atoms.numbers, vec![31, 33]);
    }

    #[test]
    fn test_parse_poscar_errors() {
        assert!(parse_poscar_content("too\nshort\n", "x").is_err());

        let unknown = "x\n1.0\n1 0 0\n0 1 0\n0 0 1\nQq\n1\nDirect\n0 0 0\n";
        assert!(parse_poscar_content(unknown, "x").is_err());

        let truncated = "x\n1.0\n1 0 0\n0 1 0\n0 0 1\nH\n3\nDirect\n0 0 0\n";
        assert!(parse_poscar_content(truncated, "x").is_err());
    }
}
