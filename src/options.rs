use std::collections::HashMap;

use crate::error::OptionError;

/// Where the values of an option end up.
pub enum Destination<'a> {
    Flag(&'a mut bool),
    Text(&'a mut String),
    Integer(&'a mut i64),
    TextList(&'a mut Vec<String>),
    IntegerList(&'a mut Vec<i64>),
}

struct OptionSpec<'a> {
    short: String,
    long: String,
    destination: Destination<'a>,
    description: String,
}

/// Minimal getopt-like parser.
///
/// Options are bound to caller-owned storage at registration time. An option
/// takes as values every following token up to the next token that names a
/// registered option, so `-p foo bar -l 5` gives `-p` two values. Single-valued
/// options take only the first of those; list options take them all.
#[derive(Default)]
pub struct OptionParser<'a> {
    options: Vec<OptionSpec<'a>>,
}

impl<'a> OptionParser<'a> {
    pub fn new() -> Self {
        OptionParser { options: Vec::new() }
    }

    /// Bind `-short` and/or `--long` to a destination. Either name may be empty, not both.
    pub fn register(
        &mut self,
        short: &str,
        long: &str,
        destination: Destination<'a>,
        description: &str
    ) -> Result<(), OptionError> {
        if short.is_empty() && long.is_empty() {
            return Err(OptionError::EmptyName);
        }
        if short.chars().count() > 1 {
            return Err(OptionError::InvalidShortName(short.to_string()));
        }

        self.options.push(OptionSpec {
            short: short.to_string(),
            long: long.to_string(),
            destination,
            description: description.to_string(),
        });
        Ok(())
    }

    pub fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> Result<(), OptionError> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let lookup = self.lookup_table();

        let mut i = 0;
        while i < args.len() {
            let token = args[i];
            if token.len() < 2 || !token.starts_with('-') {
                return Err(OptionError::Syntax(token.to_string()));
            }

            if token.starts_with("--") || token.chars().count() == 2 {
                i = self.handle(token, i, &lookup, &args)?;
            } else {
                // -abc is -a -b -c, each taking its values after the previous one's
                for c in token[1..].chars() {
                    i = self.handle(&format!("-{}", c), i, &lookup, &args)?;
                }
            }

            i += 1;
        }

        Ok(())
    }

    /// Render the help table.
    pub fn usage(&self, summary: &str) -> String {
        let mut text = format!("Usage: {}\n", summary);
        for option in &self.options {
            let line = match (option.short.is_empty(), option.long.is_empty()) {
                (false, false) =>
                    format!("  -{}  --{:<16} {}\n", option.short, option.long, option.description),
                (false, true) => format!("  -{}    {:<16} {}\n", option.short, "", option.description),
                _ => format!("      --{:<16} {}\n", option.long, option.description),
            };
            text.push_str(&line);
        }
        text
    }

    fn lookup_table(&self) -> HashMap<String, usize> {
        let mut lookup = HashMap::new();
        for (index, option) in self.options.iter().enumerate() {
            if !option.short.is_empty() {
                lookup.insert(format!("-{}", option.short), index);
            }
            if !option.long.is_empty() {
                lookup.insert(format!("--{}", option.long), index);
            }
        }
        lookup
    }

    /// Apply the option `name` found at `position`. Returns the index of the last token consumed.
    fn handle(
        &mut self,
        name: &str,
        position: usize,
        lookup: &HashMap<String, usize>,
        args: &[&str]
    ) -> Result<usize, OptionError> {
        let index = *lookup
            .get(name)
            .ok_or_else(|| OptionError::UnknownOption(name.to_string()))?;

        let end = args[position + 1..]
            .iter()
            .position(|arg| lookup.contains_key(*arg))
            .map_or(args.len(), |offset| position + 1 + offset);
        let candidates = &args[position + 1..end];
        let missing = || OptionError::MissingArgument(name.to_string());

        match &mut self.options[index].destination {
            Destination::Flag(flag) => {
                **flag = true;
                Ok(position)
            }
            Destination::Text(text) => {
                let value = candidates.first().ok_or_else(missing)?;
                **text = value.to_string();
                Ok(position + 1)
            }
            Destination::Integer(number) => {
                let value = candidates.first().ok_or_else(missing)?;
                **number = parse_integer(name, value)?;
                Ok(position + 1)
            }
            Destination::TextList(list) => {
                if candidates.is_empty() {
                    return Err(missing());
                }
                list.extend(candidates.iter().map(|value| value.to_string()));
                Ok(end - 1)
            }
            Destination::IntegerList(list) => {
                if candidates.is_empty() {
                    return Err(missing());
                }
                let values = candidates
                    .iter()
                    .map(|value| parse_integer(name, value))
                    .collect::<Result<Vec<_>, _>>()?;
                list.extend(values);
                Ok(end - 1)
            }
        }
    }
}

fn parse_integer(option: &str, value: &str) -> Result<i64, OptionError> {
    value.parse().map_err(|_| OptionError::InvalidInteger {
        option: option.to_string(),
        value: value.to_string(),
    })
}
