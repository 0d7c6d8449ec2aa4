use {
	crate::{Error, ValidationError},
	std::io::{self, BufRead, Write},
};

fn readLine(input: &mut impl BufRead) -> Result<String, Error> {
	let mut line = String::new();
	if input.read_line(&mut line)? == 0 {
		return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
	}
	Ok(line)
}

/// Two integers separated by whitespace and/or a comma.
pub fn parsePoint(line: &str) -> Result<[i64; 2], ValidationError> {
	let coords = line.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty()).collect::<Vec<_>>();
	if coords.len() != 2 {
		return Err(ValidationError::WrongArity { expected: 2, actual: coords.len() });
	}
	let mut point = [0; 2];
	for (coord, s) in point.iter_mut().zip(coords) {
		*coord = s.parse().map_err(|_| ValidationError::NotANumber(s.to_owned()))?;
	}
	Ok(point)
}

/// Asks for the `what` coordinates until `validate` accepts them, at most `maxAttempts` times.
/// Every rejected line, unparsable or invalid, uses up an attempt.
pub fn promptPoint<T>(
	input: &mut impl BufRead,
	output: &mut impl Write,
	what: &'static str,
	maxAttempts: u32,
	mut validate: impl FnMut([i64; 2]) -> Result<T, ValidationError>,
) -> Result<T, Error> {
	for _ in 0..maxAttempts {
		write!(output, "Enter the x and y coordinates of the {what}: ")?;
		output.flush()?;
		match parsePoint(&readLine(input)?).and_then(&mut validate) {
			Ok(value) => return Ok(value),
			Err(err) => writeln!(output, "Invalid input: {err}. Please enter valid coordinates.")?,
		}
	}
	Err(Error::TooManyInvalidInputs { what, attempts: maxAttempts })
}

/// An empty answer or one starting with `y` confirms; one starting with `n` declines.
pub fn confirm(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> Result<bool, Error> {
	loop {
		write!(output, "{question} [Y/n] ")?;
		output.flush()?;
		match readLine(input)?.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
			None | Some('y') => return Ok(true),
			Some('n') => return Ok(false),
			Some(_) => {}
		}
	}
}
