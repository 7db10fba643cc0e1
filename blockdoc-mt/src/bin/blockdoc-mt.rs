use blockdoc_mt::{
    DeepLProvider, Document, MachineTranslator, MockMode, MockTranslator, TranslationConfig,
    translate_document, translate_document_body,
};
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("blockdoc-mt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate block documents with DeepL")
        .arg(
            Arg::new("input")
                .help("File holding a serialized block body, or a JSON document with --document")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("document")
                .long("document")
                .short('d')
                .help("Read the input as a JSON document and print the translated document as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("field")
                .long("field")
                .short('f')
                .help("Custom field to translate (repeatable, only with --document)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source language code (default: DEEPL_SOURCE_LANG or DE)"),
        )
        .arg(
            Arg::new("target-locale")
                .long("target")
                .short('t')
                .help("Target language code (default: DEEPL_TARGET_LANG or EN-US)"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator instead of DeepL")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every translation call")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let default_filter = if verbose {
        "blockdoc_mt=debug"
    } else {
        "blockdoc_mt=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let input_path = matches
        .get_one::<String>("input")
        .ok_or("missing input file")?;
    let input = std::fs::read_to_string(input_path)?;
    let use_mock = matches.get_flag("mock");

    let mut config = if use_mock {
        TranslationConfig::new("mock")
    } else {
        match TranslationConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {}", e);
                eprintln!("   Set it with: export DEEPL_API_KEY=your_api_key");
                eprintln!("   Or use --mock to use mock translator");
                return Err(e.into());
            }
        }
    };
    if let Some(source) = matches.get_one::<String>("source-locale") {
        config.source_lang = source.clone();
    }
    if let Some(target) = matches.get_one::<String>("target-locale") {
        config.target_lang = target.clone();
    }
    config.validate()?;

    let translator: Box<dyn MachineTranslator> = if use_mock {
        Box::new(MockTranslator::new(MockMode::Suffix))
    } else {
        Box::new(DeepLProvider::new(&config)?)
    };

    if verbose {
        eprintln!(
            "🌍 {} → {} via {}",
            config.source_code(),
            config.target_code(),
            translator.provider_name()
        );
    }

    if matches.get_flag("document") {
        let document: Document = serde_json::from_str(&input)?;
        let fields: Vec<String> = matches
            .get_many::<String>("field")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let result = translate_document(translator.as_ref(), &config, &document, &fields).await?;
        if verbose {
            eprintln!("✅ {}", result.message());
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let result = translate_document_body(translator.as_ref(), &config, &input).await?;
        if verbose {
            eprintln!(
                "✅ {} translated, {} skipped, {} failed",
                result.stats.translated, result.stats.skipped, result.stats.failed
            );
        }
        print!("{}", result.content);
    }

    Ok(())
}
