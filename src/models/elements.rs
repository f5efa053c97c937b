//! # 元素数据表
//!
//! 提供按原子序数索引的元素符号、共价半径和显示颜色。
//!
//! ## 数据来源
//! - 共价半径: B. Cordero et al., Dalton Trans. 2832 (2008)，单位 Å
//! - 颜色: Jmol CPK 配色方案
//!
//! 下标 0 为未知元素 `X`。
//!
//! ## 依赖关系
//! - 被 `plot/atoms.rs` 调用获取原子尺寸和颜色
//! - 被 `parsers/poscar.rs` 调用将元素符号转换为原子序数
//! - 纯静态数据，无外部依赖

use plotters::style::RGBColor;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 单个元素的显示参数
#[derive(Debug, Clone, Copy)]
pub struct ElementData {
    pub symbol: &'static str,
    /// 共价半径 (Å)
    pub covalent_radius: f64,
    pub color: RGBColor,
}

const fn el(symbol: &'static str, covalent_radius: f64, hex: u32) -> ElementData {
    ElementData {
        symbol,
        covalent_radius,
        color: RGBColor((hex >> 16) as u8, (hex >> 8) as u8, hex as u8),
    }
}

/// 元素表，下标为原子序数
pub static ELEMENTS: [ElementData; 97] = [
    el("X", 0.20, 0xFF1493),
    el("H", 0.31, 0xFFFFFF),
    el("He", 0.28, 0xD9FFFF),
    el("Li", 1.28, 0xCC80FF),
    el("Be", 0.96, 0xC2FF00),
    el("B", 0.84, 0xFFB5B5),
    el("C", 0.76, 0x909090),
    el("N", 0.71, 0x3050F8),
    el("O", 0.66, 0xFF0D0D),
    el("F", 0.57, 0x90E050),
    el("Ne", 0.58, 0xB3E3F5),
    el("Na", 1.66, 0xAB5CF2),
    el("Mg", 1.41, 0x8AFF00),
    el("Al", 1.21, 0xBFA6A6),
    el("Si", 1.11, 0xF0C8A0),
    el("P", 1.07, 0xFF8000),
    el("S", 1.05, 0xFFFF30),
    el("Cl", 1.02, 0x1FF01F),
    el("Ar", 1.06, 0x80D1E3),
    el("K", 2.03, 0x8F40D4),
    el("Ca", 1.76, 0x3DFF00),
    el("Sc", 1.70, 0xE6E6E6),
    el("Ti", 1.60, 0xBFC2C7),
    el("V", 1.53, 0xA6A6AB),
    el("Cr", 1.39, 0x8A99C7),
    el("Mn", 1.39, 0x9C7AC7),
    el("Fe", 1.32, 0xE06633),
    el("Co", 1.26, 0xF090A0),
    el("Ni", 1.24, 0x50D050),
    el("Cu", 1.32, 0xC88033),
    el("Zn", 1.22, 0x7D80B0),
    el("Ga", 1.22, 0xC28F8F),
    el("Ge", 1.20, 0x668F8F),
    el("As", 1.19, 0xBD80E3),
    el("Se", 1.20, 0xFFA100),
    el("Br", 1.20, 0xA62929),
    el("Kr", 1.16, 0x5CB8D1),
    el("Rb", 2.20, 0x702EB0),
    el("Sr", 1.95, 0x00FF00),
    el("Y", 1.90, 0x94FFFF),
    el("Zr", 1.75, 0x94E0E0),
    el("Nb", 1.64, 0x73C2C9),
    el("Mo", 1.54, 0x54B5B5),
    el("Tc", 1.47, 0x3B9E9E),
    el("Ru", 1.46, 0x248F8F),
    el("Rh", 1.42, 0x0A7D8C),
    el("Pd", 1.39, 0x006985),
    el("Ag", 1.45, 0xC0C0C0),
    el("Cd", 1.44, 0xFFD98F),
    el("In", 1.42, 0xA67573),
    el("Sn", 1.39, 0x668080),
    el("Sb", 1.39, 0x9E63B5),
    el("Te", 1.38, 0xD47A00),
    el("I", 1.39, 0x940094),
    el("Xe", 1.40, 0x429EB0),
    el("Cs", 2.44, 0x57178F),
    el("Ba", 2.15, 0x00C900),
    el("La", 2.07, 0x70D4FF),
    el("Ce", 2.04, 0xFFFFC7),
    el("Pr", 2.03, 0xD9FFC7),
    el("Nd", 2.01, 0xC7FFC7),
    el("Pm", 1.99, 0xA3FFC7),
    el("Sm", 1.98, 0x8FFFC7),
    el("Eu", 1.98, 0x61FFC7),
    el("Gd", 1.96, 0x45FFC7),
    el("Tb", 1.94, 0x30FFC7),
    el("Dy", 1.92, 0x1FFFC7),
    el("Ho", 1.92, 0x00FF9C),
    el("Er", 1.89, 0x00E675),
    el("Tm", 1.90, 0x00D452),
    el("Yb", 1.87, 0x00BF38),
    el("Lu", 1.87, 0x00AB24),
    el("Hf", 1.75, 0x4DC2FF),
    el("Ta", 1.70, 0x4DA6FF),
    el("W", 1.62, 0x2194D6),
    el("Re", 1.51, 0x267DAB),
    el("Os", 1.44, 0x266696),
    el("Ir", 1.41, 0x175487),
    el("Pt", 1.36, 0xD0D0E0),
    el("Au", 1.36, 0xFFD123),
    el("Hg", 1.32, 0xB8B8D0),
    el("Tl", 1.45, 0xA6544D),
    el("Pb", 1.46, 0x575961),
    el("Bi", 1.48, 0x9E4FB5),
    el("Po", 1.40, 0xAB5C00),
    el("At", 1.50, 0x754F45),
    el("Rn", 1.50, 0x428296),
    el("Fr", 2.60, 0x420066),
    el("Ra", 2.21, 0x007D00),
    el("Ac", 2.15, 0x70ABFA),
    el("Th", 2.06, 0x00BAFF),
    el("Pa", 2.00, 0x00A1FF),
    el("U", 1.96, 0x008FFF),
    el("Np", 1.90, 0x0080FF),
    el("Pu", 1.87, 0x006BFF),
    el("Am", 1.80, 0x545CF2),
    el("Cm", 1.69, 0x785CE3),
];

static SYMBOL_TO_NUMBER: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    ELEMENTS
        .iter()
        .enumerate()
        .skip(1)
        .map(|(z, e)| (e.symbol, z))
        .collect()
});

/// 获取元素数据，超出表范围的原子序数视为未知元素
pub fn element(number: usize) -> &'static ElementData {
    ELEMENTS.get(number).unwrap_or(&ELEMENTS[0])
}

/// 共价半径 (Å)
pub fn covalent_radius(number: usize) -> f64 {
    element(number).covalent_radius
}

/// CPK 颜色
pub fn cpk_color(number: usize) -> RGBColor {
    element(number).color
}

/// 元素符号
pub fn symbol(number: usize) -> &'static str {
    element(number).symbol
}

/// 元素符号转原子序数
pub fn atomic_number(symbol: &str) -> Option<usize> {
    // 尝试直接匹配
    if let Some(&z) = SYMBOL_TO_NUMBER.get(symbol) {
        return Some(z);
    }

    // 去掉数字标签（如 "Fe1"、"O_2"）
    let letters: String = symbol
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    // 规范化大小写后再取前两个字符、第一个字符
    let mut chars = letters.chars();
    let normalized: String = match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => return None,
    };

    let two: String = normalized.chars().take(2).collect();
    if let Some(&z) = SYMBOL_TO_NUMBER.get(two.as_str()) {
        return Some(z);
    }

    let one: String = normalized.chars().take(1).collect();
    SYMBOL_TO_NUMBER.get(one.as_str()).copied()
}
