use std::io;

use anotex::{AnnotationExporter, AnnotationExtractor, ExtractOptions, MarkdownExporter};

use crate::cli::Cli;

pub fn run(cli: &Cli) -> Result<(), i32> {
    let mut options = ExtractOptions::default();
    if let Some(password) = &cli.password {
        options = options.with_password(password.as_str());
    }
    if let Some(norm) = cli.unicode_norm {
        options = options.with_unicode_norm(norm.to_unicode_norm());
    }
    let extractor = AnnotationExtractor::new().with_options(options);

    if cli.stdout {
        let doc = extractor.read_annotations(&cli.input).map_err(report)?;
        let mut out = io::stdout().lock();
        return MarkdownExporter.export(&doc, &mut out).map_err(report);
    }

    println!("Reading input document: '{}'", cli.input.display());
    let written = extractor
        .extract_annotations(&cli.input, cli.output.as_deref())
        .map_err(report)?;
    println!("Annotations extracted to: '{}'", written.display());
    Ok(())
}

fn report(err: anotex::AnotexError) -> i32 {
    eprintln!("Error: {err}");
    1
}
