//! # 原子结构投影图
//!
//! 将原子结构投影到坐标平面：绘制晶胞 12 条棱、按共价半径和 CPK 颜色
//! 绘制原子圆盘，可选原子编号和扫描区域矩形。
//!
//! ## 绘制顺序
//! 原子按面外坐标升序排序后依次绘制，近处原子覆盖远处原子（画家算法）。
//!
//! ## 依赖关系
//! - 被 `commands/atoms.rs` 调用
//! - 使用 `models/structure.rs` 的 Atoms
//! - 使用 `models/elements.rs` 获取半径和颜色

use crate::error::{EmPlotError, Result};
use crate::models::{elements, Atoms};
use crate::plot::axes::{Axes, Patch};

use plotters::style::{RGBColor, BLACK};
use std::str::FromStr;

/// 单位立方体的 12 条棱（分数坐标端点）
const CUBE_EDGES: [[[f64; 3]; 2]; 12] = [
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
    [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
    [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0]],
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0]],
    [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0]],
    [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
    [[1.0, 0.0, 0.0], [1.0, 0.0, 1.0]],
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
    [[1.0, 0.0, 1.0], [1.0, 1.0, 1.0]],
    [[1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
];

const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

/// 投影平面，如 "xy"、"zx"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plane {
    axes: [usize; 3],
}

impl Plane {
    pub const XY: Plane = Plane { axes: [0, 1, 2] };

    /// [横轴, 纵轴, 面外轴] 的坐标下标
    pub fn axes(&self) -> [usize; 3] {
        self.axes
    }

    /// 横轴名称
    pub fn horizontal(&self) -> char {
        AXIS_NAMES[self.axes[0]]
    }

    /// 纵轴名称
    pub fn vertical(&self) -> char {
        AXIS_NAMES[self.axes[1]]
    }

    /// 取三维坐标在平面上的投影
    pub fn project(&self, p: [f64; 3]) -> [f64; 2] {
        [p[self.axes[0]], p[self.axes[1]]]
    }

    /// 面外坐标（深度）
    pub fn depth(&self, p: [f64; 3]) -> f64 {
        p[self.axes[2]]
    }
}

impl Default for Plane {
    fn default() -> Self {
        Plane::XY
    }
}

impl std::fmt::Display for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.horizontal(), self.vertical())
    }
}

impl FromStr for Plane {
    type Err = EmPlotError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EmPlotError::InvalidPlane(s.to_string());

        let named = s
            .chars()
            .map(|c| match c {
                'x' => Ok(0),
                'y' => Ok(1),
                'z' => Ok(2),
                _ => Err(invalid()),
            })
            .collect::<Result<Vec<usize>>>()?;

        match named.as_slice() {
            &[a, b] if a != b => Ok(Plane {
                axes: [a, b, 3 - a - b],
            }),
            _ => Err(invalid()),
        }
    }
}

/// 平面名称转坐标轴下标 [横轴, 纵轴, 面外轴]
pub fn plane_to_axes(plane: &str) -> Result<[usize; 3]> {
    Ok(plane.parse::<Plane>()?.axes())
}

/// `plot_atoms` 的选项
#[derive(Debug, Clone, PartialEq)]
pub struct AtomsPlotOptions {
    /// 平面内两个方向的扩胞次数，第三方向固定为 1
    pub repeat: (usize, usize),
    /// 扫描区域的两个角点
    pub scan_area: Option<[[f64; 2]; 2]>,
    pub plane: Plane,
    /// 原子半径 = 共价半径 × scale_atoms
    pub scale_atoms: f64,
    /// 标注排序后的原子编号
    pub numbering: bool,
}

impl Default for AtomsPlotOptions {
    fn default() -> Self {
        AtomsPlotOptions {
            repeat: (1, 1),
            scan_area: None,
            plane: Plane::XY,
            scale_atoms: 0.5,
            numbering: false,
        }
    }
}

/// 绘制原子结构投影
pub fn plot_atoms(ax: &mut Axes, atoms: &Atoms, options: &AtomsPlotOptions) -> Result<()> {
    let plane = options.plane;
    let atoms = atoms.repeated([options.repeat.0, options.repeat.1, 1])?;

    for [start, end] in CUBE_EDGES {
        let a = plane.project(atoms.lattice.to_cartesian(start));
        let b = plane.project(atoms.lattice.to_cartesian(end));
        ax.plot(vec![a[0], b[0]], vec![a[1], b[1]]).color(BLACK);
    }

    if !atoms.is_empty() {
        let mut order: Vec<usize> = (0..atoms.len()).collect();
        order.sort_by(|&i, &j| {
            plane
                .depth(atoms.positions[i])
                .total_cmp(&plane.depth(atoms.positions[j]))
        });

        for &i in &order {
            let z = atoms.numbers[i];
            ax.add_patch(Patch::Circle {
                center: plane.project(atoms.positions[i]),
                radius: elements::covalent_radius(z) * options.scale_atoms,
                face: elements::cpk_color(z),
                edge: Some(BLACK),
            });
        }

        ax.set_equal_aspect(true);
        ax.set_xlabel(plane.horizontal().to_string());
        ax.set_ylabel(plane.vertical().to_string());

        if options.numbering {
            for (n, &i) in order.iter().enumerate() {
                ax.annotate(n.to_string(), plane.project(atoms.positions[i]));
            }
        }
    }

    if let Some([p0, p1]) = options.scan_area {
        ax.add_patch(Patch::Rectangle {
            corner: p0,
            width: p1[0] - p0[0],
            height: p1[1] - p0[1],
            color: RGBColor(0, 0, 0),
            alpha: 0.33,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lattice;

    fn water_like() -> Atoms {
        Atoms::new(
            "test",
            Lattice::orthorhombic(4.0, 4.0, 4.0),
            vec![8, 1, 1],
            vec![[2.0, 2.0, 3.0], [1.0, 2.0, 1.0], [3.0, 2.0, 2.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_plane_to_axes_examples() {
        assert_eq!(plane_to_axes("xy").unwrap(), [0, 1, 2]);
        assert_eq!(plane_to_axes("zx").unwrap(), [2, 0, 1]);
        assert_eq!(plane_to_axes("yz").unwrap(), [1, 2, 0]);
    }

    #[test]
    fn test_plane_to_axes_all_valid_planes() {
        for plane in ["xy", "yx", "xz", "zx", "yz", "zy"] {
            let axes = plane_to_axes(plane).unwrap();
            let letters: Vec<usize> = plane
                .chars()
                .map(|c| AXIS_NAMES.iter().position(|&n| n == c).unwrap())
                .collect();

            assert_eq!(&axes[..2], letters.as_slice());
            assert!(!letters.contains(&axes[2]));
            assert_eq!(axes.iter().sum::<usize>(), 3);
        }
    }

    #[test]
    fn test_plane_to_axes_rejects_malformed() {
        for plane in ["", "x", "xx", "xyz", "ab", "XY", "x y"] {
            assert!(plane_to_axes(plane).is_err(), "{} should be rejected", plane);
        }
    }

    #[test]
    fn test_plane_display() {
        assert_eq!("zy".parse::<Plane>().unwrap().to_string(), "zy");
    }

    #[test]
    fn test_empty_structure_draws_cell_only() {
        let mut ax = Axes::new();
        let atoms = Atoms::empty("empty", Lattice::orthorhombic(2.0, 3.0, 4.0));

        plot_atoms(&mut ax, &atoms, &AtomsPlotOptions::default()).unwrap();

        assert_eq!(ax.lines().len(), 12);
        assert!(ax.lines().iter().all(|l| l.len() == 2));
        assert!(ax.patches().is_empty());
        assert!(ax.annotations().is_empty());
    }

    #[test]
    fn test_cell_edges_span_repeated_cell() {
        let mut ax = Axes::new();
        let options = AtomsPlotOptions {
            repeat: (2, 3),
            ..Default::default()
        };

        plot_atoms(&mut ax, &water_like(), &options).unwrap();

        let b = ax.data_bounds().unwrap();
        assert!((b.x[1] - 8.0).abs() < 1e-12);
        assert!((b.y[1] - 12.0).abs() < 1e-12);
        assert_eq!(ax.patches().len(), 3 * 6);
    }

    #[test]
    fn test_atoms_sorted_by_depth() {
        let mut ax = Axes::new();
        let options = AtomsPlotOptions {
            numbering: true,
            ..Default::default()
        };

        plot_atoms(&mut ax, &water_like(), &options).unwrap();

        // 深度 z: H(1.0) < H(2.0) < O(3.0)
        let centers: Vec<[f64; 2]> = ax
            .patches()
            .iter()
            .map(|p| match p {
                Patch::Circle { center, .. } => *center,
                _ => panic!("expected circles"),
            })
            .collect();
        assert_eq!(centers, vec![[1.0, 2.0], [3.0, 2.0], [2.0, 2.0]]);

        let labels: Vec<&str> = ax.annotations().iter().map(|a| a.text.as_str()).collect();
        assert_eq!(labels, vec!["0", "1", "2"]);
        assert_eq!(ax.annotations()[2].xy, [2.0, 2.0]);
        assert!(ax.is_equal_aspect());
        assert_eq!(ax.xlabel(), Some("x"));
    }

    #[test]
    fn test_atom_radius_and_color() {
        let mut ax = Axes::new();
        let options = AtomsPlotOptions {
            scale_atoms: 1.0,
            plane: "xz".parse().unwrap(),
            ..Default::default()
        };

        plot_atoms(&mut ax, &water_like(), &options).unwrap();

        // 面外轴为 y，三个原子深度相同，保持原顺序
        match &ax.patches()[0] {
            Patch::Circle {
                center,
                radius,
                face,
                ..
            } => {
                assert_eq!(*center, [2.0, 3.0]);
                assert!((radius - 0.66).abs() < 1e-12);
                assert_eq!(*face, elements::cpk_color(8));
            }
            _ => panic!("expected a circle"),
        }
        assert_eq!(ax.ylabel(), Some("z"));
    }

    #[test]
    fn test_scan_area_rectangle() {
        let mut ax = Axes::new();
        let options = AtomsPlotOptions {
            scan_area: Some([[1.0, 1.0], [3.0, 2.5]]),
            ..Default::default()
        };
        let atoms = Atoms::empty("empty", Lattice::orthorhombic(4.0, 4.0, 4.0));

        plot_atoms(&mut ax, &atoms, &options).unwrap();

        assert_eq!(
            ax.patches(),
            &[Patch::Rectangle {
                corner: [1.0, 1.0],
                width: 2.0,
                height: 1.5,
                color: RGBColor(0, 0, 0),
                alpha: 0.33,
            }]
        );
    }

    #[test]
    fn test_input_structure_not_modified() {
        let atoms = water_like();
        let before = atoms.clone();
        let options = AtomsPlotOptions {
            repeat: (3, 3),
            ..Default::default()
        };

        plot_atoms(&mut Axes::new(), &atoms, &options).unwrap();
        assert_eq!(atoms, before);
    }
}
