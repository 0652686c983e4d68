use crate::kmlib::{KMeansResult, KmParams, OutputFormat, PointStore, Result};
use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Serialize)]
struct Report<'a> {
    params: &'a KmParams,
    iterations: usize,
    wcss: f64,
    assignments: &'a [Option<usize>],
    centroids: Vec<Vec<f64>>,
}

pub struct ResultWriter<W: Write> {
    writer: W,
}

/// Buffered handle on `out_path`, or stdout when None
pub fn open_output(out_path: &Option<PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match out_path {
        Some(path) => {
            let m_page = page_size::get() * 100;
            Box::new(BufWriter::with_capacity(m_page, File::create(path)?))
        }
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}

impl ResultWriter<Box<dyn Write>> {
    /// Given an optional path, setup the output (stdout when None)
    pub fn create(out_path: &Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            writer: open_output(out_path)?,
        })
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write(
        &mut self,
        result: &KMeansResult,
        points: &PointStore,
        params: &KmParams,
        format: OutputFormat,
    ) -> Result<()> {
        match format {
            OutputFormat::Labels => self.write_labels(result)?,
            OutputFormat::Centroids => self.write_centroids(result)?,
            OutputFormat::Clusters => self.write_clusters(result)?,
            OutputFormat::Json => self.write_json(result, points, params)?,
        }
        self.writer.flush()?;
        Ok(())
    }

    /// One label per line, -1 for observations that were never assigned
    fn write_labels(&mut self, result: &KMeansResult) -> Result<()> {
        for label in result.labels() {
            match label {
                Some(c) => writeln!(self.writer, "{}", c)?,
                None => writeln!(self.writer, "-1")?,
            }
        }
        Ok(())
    }

    fn write_centroids(&mut self, result: &KMeansResult) -> Result<()> {
        for row in result.centroids().rows() {
            writeln!(
                self.writer,
                "{}",
                row.iter().map(|v| format!("{:.4}", v)).join(",")
            )?;
        }
        Ok(())
    }

    /// K on the first line, then the members of each non-empty cluster
    fn write_clusters(&mut self, result: &KMeansResult) -> Result<()> {
        writeln!(self.writer, "{}", result.k())?;
        for members in result.members().iter().filter(|m| !m.is_empty()) {
            writeln!(self.writer, "{}", members.iter().join(","))?;
        }
        Ok(())
    }

    fn write_json(
        &mut self,
        result: &KMeansResult,
        points: &PointStore,
        params: &KmParams,
    ) -> Result<()> {
        let report = Report {
            params,
            iterations: result.iterations,
            wcss: result.wcss(points),
            assignments: result.labels(),
            centroids: result.centroids().rows().into_iter().map(|r| r.to_vec()).collect(),
        };
        serde_json::to_writer_pretty(&mut self.writer, &report)?;
        writeln!(self.writer)?;
        Ok(())
    }
}
