//! Interactive front end that turns operator answers into a [`RunConfig`].

use crate::config::{
    non_empty, BatchConfig, RenderOptions, RunConfig, RunMode, SingleConfig, SourceKind,
    DEFAULT_FOLDER,
};
use crate::utils::error::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const FORMAT_PROMPT: &str = "\n-------------\n\
Enter the format each batch item should fill in.\n\n\
e.g. https://mydomain.com/$$<keyX>/$$<keyY>?$$<someOtherKey>=$$<someFinalKey>\n\n\
Variables are inserted with $$<key>\n\n\
Format: ";

/// Asks the operator for a run description, one line per question.
pub struct InputCollector<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InputCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes the query and returns the trimmed answer; end of input yields "".
    pub fn ask(&mut self, query: &str) -> Result<String> {
        write!(self.output, "{}", query)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    pub fn confirm(&mut self, query: &str) -> Result<bool> {
        Ok(self.ask(query)?.eq_ignore_ascii_case("y"))
    }

    pub fn collect(
        mut self,
        output_root: impl Into<PathBuf>,
        render: RenderOptions,
    ) -> Result<RunConfig> {
        let batch = self.confirm("Batch? (y/N): ")?;
        let data_source = self.ask(if batch {
            "Enter the data source [json/CSV]: "
        } else {
            "URL: "
        })?;
        let save = self.confirm("Save to file? (y/N): ")?;

        let mode = if batch {
            let source: SourceKind = data_source.parse()?;
            let location = self.ask("Enter the link to the data: ")?;
            let payload_template = self.ask(FORMAT_PROMPT)?;
            let group_by = non_empty(Some(
                self.ask("Enter the key by which the data should be grouped []: ")?,
            ));
            let naming_template = self.ask(
                "Enter the format which defines the naming convention for the files \
                 (use of variable keys $$<key> required): ",
            )?;
            let folder = if save {
                non_empty(Some(self.ask("Enter the folder name [QRCode]: ")?))
            } else {
                None
            };

            RunMode::Batch(BatchConfig {
                source,
                location,
                payload_template,
                naming_template,
                group_by,
                save,
                folder: folder.unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
            })
        } else {
            let filename = if save {
                non_empty(Some(self.ask("Enter the filename: ")?))
            } else {
                None
            };

            RunMode::Single(SingleConfig {
                content: data_source,
                save,
                filename,
            })
        };

        tracing::debug!("Collected run configuration: {:?}", mode);
        Ok(RunConfig::new(mode)
            .with_output_root(output_root)
            .with_render(render))
    }
}
