use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use javasm::tree::class::ClassFile;
use javasm::tree::method::Method;

#[derive(Debug, Parser)]
struct Cli {
	/// Be verbose, give this twice to see every instruction read.
	#[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Assembles a class listing and writes the resulting class tree
	Assemble {
		input: PathBuf,
		/// Where to write the class tree to, defaults to stdout
		#[arg(short = 'o', long = "output")]
		output: Option<PathBuf>,
	},
	/// Assembles a listing of a single method and writes the resulting method tree to stdout
	Method {
		input: PathBuf,
		/// Read the method as a member of an annotation interface, allowing a `default=` value
		#[arg(long = "interface")]
		interface: bool,
	},
	/// Checks that all the given class listings can be assembled
	Check {
		#[arg(required = true)]
		inputs: Vec<PathBuf>,
	},
}

fn setup_logging(verbose: u8) -> Result<()> {
	let level = match verbose {
		0 => LevelFilter::Info,
		1 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

fn read_input(path: &Path) -> Result<String> {
	std::fs::read_to_string(path)
		.with_context(|| anyhow!("failed to read listing {path:?}"))
}

fn assemble(input: &Path, output: Option<&Path>) -> Result<()> {
	let text = read_input(input)?;
	let class = javasm::read_class(&text)
		.with_context(|| anyhow!("failed to assemble {input:?}"))?;
	info!("assembled class {} with {} fields and {} methods", class.name, class.fields.len(), class.methods.len());

	match output {
		Some(output) => {
			let mut file = File::create(output)
				.with_context(|| anyhow!("failed to create output file {output:?}"))?;
			writeln!(file, "{class:#?}")?;
		},
		None => println!("{class:#?}"),
	}
	Ok(())
}

fn method(input: &Path, interface: bool) -> Result<()> {
	let text = read_input(input)?;
	let method = javasm::read_method_into(&text, interface, |access, name, descriptor, signature, exceptions| {
		Ok(Method::new(access, name, descriptor, signature, exceptions))
	}).with_context(|| anyhow!("failed to assemble method {input:?}"))?;
	println!("{method:#?}");
	Ok(())
}

/// Returns the number of listings that failed to assemble.
fn check(inputs: &[PathBuf]) -> usize {
	let mut failed = 0;
	for input in inputs {
		let result = read_input(input)
			.and_then(|text| javasm::read_class_multi(&text, Vec::<ClassFile>::new()));
		match result {
			Ok(classes) => info!("{input:?}: ok, {} classes", classes.len()),
			Err(e) => {
				error!("{input:?}: {e:?}");
				failed += 1;
			},
		}
	}
	failed
}

fn main() -> Result<ExitCode> {
	let cli = Cli::parse();
	setup_logging(cli.verbose)?;

	match cli.command {
		Command::Assemble { input, output } => assemble(&input, output.as_deref())?,
		Command::Method { input, interface } => method(&input, interface)?,
		Command::Check { inputs } => {
			let failed = check(&inputs);
			if failed > 0 {
				error!("{failed} of {} listings failed to assemble", inputs.len());
				return Ok(ExitCode::FAILURE);
			}
		},
	}
	Ok(ExitCode::SUCCESS)
}
