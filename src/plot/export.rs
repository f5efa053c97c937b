//! # 曲线数据导出
//!
//! 将 `Axes` 中记录的线条导出为 CSV（长格式）。
//!
//! ## 格式
//! 列为 `label,x,y`，每个数据点一行；未命名线条的 label 为 `line<序号>`。
//! 数值按最短可往返表示写出，不截断小数位。
//!
//! ## 依赖关系
//! - 被 `commands/ctf.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{EmPlotError, Result};
use crate::plot::axes::Axes;

use std::io::Write;
use std::path::Path;

/// 写入任意 Writer
pub fn write_lines_csv<W: Write>(ax: &Axes, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["label", "x", "y"])?;

    for (i, line) in ax.lines().iter().enumerate() {
        let label = line
            .label
            .clone()
            .unwrap_or_else(|| format!("line{}", i));

        for (x, y) in line.xs.iter().zip(&line.ys) {
            let (x, y) = (x.to_string(), y.to_string());
            wtr.write_record([label.as_str(), x.as_str(), y.as_str()])?;
        }
    }

    wtr.flush()
        .map_err(|e| EmPlotError::Other(format!("failed to flush CSV output: {}", e)))?;
    Ok(())
}

/// 导出线条为 CSV 文件
pub fn lines_to_csv(ax: &Axes, output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path).map_err(|e| EmPlotError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    write_lines_csv(ax, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_format_output() {
        let mut ax = Axes::new();
        ax.plot(vec![0.0, 0.5], vec![1.0, -1.0]).label("CTF");
        ax.plot(vec![2.0], vec![3.0]);

        let mut buffer = Vec::new();
        write_lines_csv(&ax, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "label,x,y",
                "CTF,0,1",
                "CTF,0.5,-1",
                "line1,2,3",
            ]
        );
    }

    #[test]
    fn test_small_values_survive() {
        let ys = vec![1e-9, 3.2e-7, 0.0121, -4.5e-12];
        let mut ax = Axes::new();
        ax.plot(vec![0.0, 0.1, 0.2, 0.3], ys.clone()).label("intensity");

        let mut buffer = Vec::new();
        write_lines_csv(&ax, &mut buffer).unwrap();

        let mut rdr = csv::Reader::from_reader(buffer.as_slice());
        let parsed: Vec<f64> = rdr
            .records()
            .map(|r| r.unwrap()[2].parse::<f64>().unwrap())
            .collect();
        assert_eq!(parsed, ys);
    }

    #[test]
    fn test_empty_axes_writes_header_only() {
        let mut buffer = Vec::new();
        write_lines_csv(&Axes::new(), &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "label,x,y\n");
    }
}
