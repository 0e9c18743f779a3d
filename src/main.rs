//! simjson CLI.
//!
//! Decodes, validates and queries JSON documents from a file or stdin.
//! Results that are errors are printed as `{"err": {"code": N, "name": "..."}}`
//! on stdout with exit code 1; I/O failures exit with code 2.

use clap::{Args, Parser, Subcommand};
use simjson::conformance::{CorpusRunner, TestResult};
use simjson::{
    decode_with_limits, encode_with_options, Array, DecodeLimits, EncodeOptions, ErrorCode, Object,
    SimjsonResult, Value,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, Level};

/// Bucket count used by the demo document.
const DEMO_BUCKETS: usize = 128;

const DEMO_DOCUMENT: &str =
    r#"{"married": false, "info": [170, 65.5], "city": "Shenzhen", "sex": "Male", "age": 30}"#;

#[derive(Parser)]
#[command(name = "simjson")]
#[command(about = "simjson - JSON value model, decoder and encoder", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a document and print it re-encoded
    Format {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
        #[command(flatten)]
        decode: DecodeArgs,
        /// Significant digits for floats
        #[arg(long, default_value_t = EncodeOptions::FLOAT_PRECISION)]
        precision: usize,
    },

    /// Validate a document
    Check {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Print the value at a path of object keys and array indices
    Get {
        /// Path segments, outermost first
        #[arg(required = true)]
        path: Vec<String>,
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Build, encode and decode a sample document
    Demo,

    /// Run a conformance corpus
    Corpus {
        /// Corpus JSON file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct DecodeArgs {
    /// Use lenient limits (no size cap, deeper nesting)
    #[arg(long)]
    lenient: bool,
    /// Maximum nesting depth
    #[arg(long)]
    max_depth: Option<u64>,
    /// Bucket count for decoded objects (0 = default)
    #[arg(long)]
    buckets: Option<usize>,
}

impl DecodeArgs {
    fn limits(&self) -> DecodeLimits {
        let mut limits = if self.lenient {
            DecodeLimits::lenient()
        } else {
            DecodeLimits::standard()
        };
        if let Some(depth) = self.max_depth {
            limits.max_nesting_depth = depth;
        }
        if let Some(buckets) = self.buckets {
            limits = limits.with_object_buckets(buckets);
        }
        limits
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Format {
            file,
            decode,
            precision,
        }) => {
            let options = EncodeOptions {
                float_precision: precision,
                ..EncodeOptions::standard()
            };
            with_input(file.as_deref(), |input| {
                let value = decode_with_limits(input, decode.limits())?;
                encode_with_options(&value, options)
            })
        }
        Some(Commands::Check { file, decode }) => {
            let input = match read_input(file.as_deref()) {
                Ok(input) => input,
                Err(e) => return io_failure(e),
            };
            match decode_with_limits(&input, decode.limits()) {
                Ok(_) => {
                    println!("{{\"ok\": true}}");
                    ExitCode::SUCCESS
                }
                Err(e) => report_error(&e),
            }
        }
        Some(Commands::Get { path, file, decode }) => with_input(file.as_deref(), |input| {
            let value = decode_with_limits(input, decode.limits())?;
            let found = walk(&value, &path)?;
            encode_with_options(found, EncodeOptions::standard())
        }),
        Some(Commands::Demo) => run_demo(),
        Some(Commands::Corpus { file }) => run_corpus(&file),
        Some(Commands::Version) => {
            println!("simjson v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        None => {
            println!("simjson v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            ExitCode::SUCCESS
        }
    }
}

fn read_input(file: Option<&Path>) -> std::io::Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path),
        None => {
            let mut input = Vec::new();
            std::io::stdin().read_to_end(&mut input)?;
            Ok(input)
        }
    }
}

/// Read the input, run `op` on it and print the bytes it produces.
fn with_input(file: Option<&Path>, op: impl FnOnce(&[u8]) -> SimjsonResult<Vec<u8>>) -> ExitCode {
    let input = match read_input(file) {
        Ok(input) => input,
        Err(e) => return io_failure(e),
    };
    match op(&input) {
        Ok(output) => {
            println!("{}", String::from_utf8_lossy(&output));
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn report_error(e: &ErrorCode) -> ExitCode {
    debug!(error = %e, "command failed");
    println!(
        "{{\"err\": {{\"code\": {}, \"name\": \"{}\"}}}}",
        e.code(),
        e.name()
    );
    ExitCode::from(1)
}

fn io_failure(e: std::io::Error) -> ExitCode {
    eprintln!("error: {}", e);
    ExitCode::from(2)
}

/// Follow `path` through objects (by key) and arrays (by index).
fn walk<'a>(value: &'a Value, path: &[String]) -> SimjsonResult<&'a Value> {
    let mut current = value;
    for segment in path {
        current = match current {
            Value::Object(object) => object
                .get(segment)
                .ok_or_else(|| ErrorCode::E203_KeyNotFound(segment.clone()))?,
            Value::Array(array) => {
                let index = segment
                    .parse::<usize>()
                    .map_err(|_| ErrorCode::E203_KeyNotFound(segment.clone()))?;
                array
                    .get(index)
                    .ok_or(ErrorCode::E200_IndexOutOfRange(index as u64, array.len() as u64))?
            }
            _ => return Err(ErrorCode::E203_KeyNotFound(segment.clone())),
        };
    }
    Ok(current)
}

fn run_demo() -> ExitCode {
    match demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn demo() -> SimjsonResult<()> {
    println!("-----encode json example outputs-----");

    let mut info = Array::new();
    info.insert(Value::integer(170), 0)?;
    info.insert(Value::float(65.5), info.len())?;

    let mut person = Object::with_buckets(DEMO_BUCKETS);
    person.add("city", Value::string("Shenzhen"))?;
    person.add("sex", Value::string("female"))?;
    person.add("age", Value::integer(30))?;
    person.add("married", Value::boolean(false))?;
    person.add("info", Value::Array(info))?;

    let encoded = encode_with_options(&Value::Object(person), EncodeOptions::standard())?;
    println!("{}\n", String::from_utf8_lossy(&encoded));

    println!("-----decode json example outputs-----");

    let limits = DecodeLimits::standard().with_object_buckets(DEMO_BUCKETS);
    let decoded = decode_with_limits(DEMO_DOCUMENT, limits)?;
    let field = |key: &str| {
        decoded
            .get(key)
            .ok_or_else(|| ErrorCode::E203_KeyNotFound(key.to_string()))
    };

    if let Some(married) = field("married")?.as_bool() {
        println!("married: {}", married);
    }
    if let Some(city) = field("city")?.as_str() {
        println!("city: {}", city);
    }
    if let Some(age) = field("age")?.as_i64() {
        println!("age: {}", age);
    }
    if let Some(info) = field("info")?.as_array() {
        for (index, item) in info.iter_from(0)? {
            let text = encode_with_options(item, EncodeOptions::standard())?;
            println!("info[{}]: {}", index, String::from_utf8_lossy(&text));
        }
    }
    if let Some(object) = decoded.as_object() {
        for (key, item) in object {
            println!("{}: {}", String::from_utf8_lossy(key), item.type_name());
        }
    }
    Ok(())
}

fn run_corpus(path: &Path) -> ExitCode {
    let runner = match CorpusRunner::load(path) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let results = runner.run_all();
    for (id, result) in &results.details {
        match result {
            TestResult::Fail { expected, actual } => {
                println!("FAIL {}: expected {}, actual {}", id, expected, actual)
            }
            TestResult::Error { message } => println!("ERROR {}: {}", id, message),
            TestResult::Skip { reason } => println!("SKIP {}: {}", id, reason),
            TestResult::Pass => {}
        }
    }
    println!("{}", results.summary());

    if results.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
