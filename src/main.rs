//! Command-line interface for xsdclass

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use log::{debug, error, info, LevelFilter};

#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::str::FromStr;

#[cfg(feature = "cli")]
use xsdclass::{
    BuildOptions, ClassSpec, ClassSpecBuilder, ComponentKind, Error, ResolutionCache, Schema,
    SchemaSpec, SpecGenerator, XsdSchema,
};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdclass")]
#[command(author, version, about = "Derive class specifications from XML Schema documents", long_about = None)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive specifications for each schema and store them in a document
    Generate {
        /// Schema files, processed in order
        #[arg(value_name = "SCHEMA", required = true)]
        inputs: Vec<PathBuf>,

        /// Specification document to update
        #[arg(short, long, default_value = "spec.json")]
        output: PathBuf,

        /// Supertype of entities that reference no group
        #[arg(long, default_value = "Node")]
        base_class: String,
    },

    /// Show the class specification of one schema entity
    Inspect {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Named group to inspect
        #[arg(short, long, conflicts_with_all = ["type_name", "element"])]
        group: Option<String>,

        /// Named type to inspect
        #[arg(short = 't', long = "type", conflicts_with = "element")]
        type_name: Option<String>,

        /// Global element to inspect
        #[arg(short, long)]
        element: Option<String>,

        /// List accessor declarations
        #[arg(short, long)]
        accessors: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        /// Supertype of entities that reference no group
        #[arg(long, default_value = "Node")]
        base_class: String,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    let command = &cli.command;
    debug!(command:?; "Parsed arguments");

    let result = match cli.command {
        Commands::Generate {
            inputs,
            output,
            base_class,
        } => cmd_generate(inputs, output, base_class),
        Commands::Inspect {
            schema,
            group,
            type_name,
            element,
            accessors,
            json,
            base_class,
        } => {
            let target = match (group, type_name, element) {
                (Some(name), _, _) => Some((ComponentKind::Group, name)),
                (_, Some(name), _) => Some((ComponentKind::Type, name)),
                (_, _, Some(name)) => Some((ComponentKind::Element, name)),
                _ => None,
            };
            cmd_inspect(schema, target, accessors, json, base_class)
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_generate(inputs: Vec<PathBuf>, output: PathBuf, base_class: String) -> xsdclass::Result<()> {
    let mut generator = SpecGenerator::new(output.clone()).with_options(BuildOptions { base_class });
    let document = generator.generate(inputs.as_slice())?;

    for (name, spec) in &document.schemas {
        println!(
            "{}: {} groups, {} types, {} elements",
            name,
            spec.groups.len(),
            spec.types.len(),
            spec.elements.len()
        );
    }
    info!("Wrote {}", output.display());
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_inspect(
    schema_path: PathBuf,
    target: Option<(ComponentKind, String)>,
    show_accessors: bool,
    json_output: bool,
    base_class: String,
) -> xsdclass::Result<()> {
    let options = BuildOptions { base_class };

    let Some((kind, name)) = target else {
        let xsd = XsdSchema::from_file(&schema_path)?;
        let spec = SpecGenerator::new("spec.json")
            .with_options(options)
            .derive(xsd)?;
        return print_schema_spec(&spec, json_output);
    };

    let mut cache = ResolutionCache::new();
    let element_key = {
        let mut schema = Schema::from_file(&schema_path, &mut cache)?;
        match kind {
            ComponentKind::Group => {
                schema.get_group(&name)?;
                None
            }
            ComponentKind::Type => {
                schema.get_type(&name)?;
                None
            }
            ComponentKind::Element => Some(schema.get_element(&name)?.key().clone()),
        }
    };

    let builder = ClassSpecBuilder::new(&cache).with_options(options);
    let spec = match (kind, element_key) {
        (ComponentKind::Group, _) => {
            let group = cache.group(&name).ok_or_else(|| Error::lookup(kind, &name))?;
            builder.build_group(group)?
        }
        (ComponentKind::Type, _) => {
            let named_type = cache
                .named_type(&name)
                .ok_or_else(|| Error::lookup(kind, &name))?;
            builder.build_type(named_type)?
        }
        (ComponentKind::Element, key) => {
            let element = key
                .as_ref()
                .and_then(|key| cache.element(key))
                .ok_or_else(|| Error::lookup(kind, &name))?;
            builder.build_element(element)?
        }
    };

    if show_accessors {
        print_accessors(&spec, json_output)
    } else {
        print_class_spec(&spec, json_output)
    }
}

#[cfg(feature = "cli")]
fn print_schema_spec(spec: &SchemaSpec, json_output: bool) -> xsdclass::Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(spec)?);
        return Ok(());
    }

    println!("xsdclass v{}", xsdclass::VERSION);
    for (title, specs) in [
        ("Groups", &spec.groups),
        ("Types", &spec.types),
        ("Elements", &spec.elements),
    ] {
        println!("\n=== {} ===", title);
        for class in specs {
            println!("  {} extends {}", class.name, class.extends.join(", "));
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_class_spec(spec: &ClassSpec, json_output: bool) -> xsdclass::Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(spec)?);
        return Ok(());
    }

    println!("{} {}", spec.category, spec.name);
    println!("  Extends: {}", spec.extends.join(", "));
    if !spec.attributes.is_empty() {
        println!("  Attributes:");
        for (name, category) in spec.attributes.iter() {
            println!("    {} ({})", name, category);
        }
    }
    if !spec.elements.is_empty() {
        println!("  Elements:");
        for (name, category) in spec.elements.iter() {
            println!("    {} ({})", name, category);
        }
    }
    for collection in &spec.elements.collections {
        println!("  Collection {} of {}:", collection.tag, collection.type_name);
        for filter in &collection.filters {
            for (plural, literal) in &filter.values {
                println!("    {} -> {}", plural, filter.predicate_for(literal));
            }
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_accessors(spec: &ClassSpec, json_output: bool) -> xsdclass::Result<()> {
    let accessors = spec.accessors();
    if json_output {
        println!("{}", serde_json::to_string_pretty(&accessors)?);
        return Ok(());
    }

    for accessor in &accessors {
        match &accessor.xpath {
            Some(xpath) => println!("{}() -> {}", accessor.name, xpath),
            None => println!("{}() -> {} ({})", accessor.name, accessor.target, accessor.category),
        }
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
