use colored::Colorize;
use tracing::{ Event, Level, Subscriber };
use tracing_subscriber::{
    fmt::{ format::Writer, FmtContext, FormatEvent, FormatFields },
    registry::LookupSpan,
    EnvFilter,
};

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        }
    }
}

/// Prints just the message, prefixed with a coloured level tag. Info lines get no tag.
struct TagFormatter;

impl<S, N> FormatEvent<S, N> for TagFormatter
    where S: Subscriber + for<'a> LookupSpan<'a>, N: for<'a> FormatFields<'a> + 'static
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>
    ) -> std::fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        match *event.metadata().level() {
            Level::TRACE => write!(writer, "{} ", "[TRACE]".magenta()),
            Level::DEBUG => write!(writer, "{} ", "[DEBUG]".blue()),
            Level::INFO => Ok(()),
            Level::WARN => write!(writer, "{} ", "[WARN]".yellow()),
            Level::ERROR => write!(writer, "{} ", "[ERROR]".red().bold()),
        }?;

        writeln!(writer, "{}", visitor.message.unwrap_or_default())
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the `--debug` switch.
pub fn setup_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(TagFormatter)
        .init();
}
