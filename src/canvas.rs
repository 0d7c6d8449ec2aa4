use {
	crate::{
		geometry::{self, TargetRectangle, Vec2, X, Y},
		palette::PaletteColor,
		Error, ValidationError, WriteFailure,
	},
	const_format::concatcp,
	serde::{de::DeserializeOwned, Deserialize, Serialize},
	serde_json::Value,
	std::time::Duration,
	tracing::debug,
};

const API: &str = "/api/";
pub const ACTIVE_ENDPOINT: &str = concatcp!(API, "active");
pub const DELAY_ENDPOINT: &str = concatcp!(API, "delay");
pub const SIZE_ENDPOINT: &str = concatcp!(API, "size");
pub const PIXEL_ENDPOINT: &str = concatcp!(API, "pixel");

/// The remote canvas service. Startup queries fail with [`Error::RemoteUnavailable`]; a pixel
/// write only ever fails for that pixel.
pub trait CanvasApi {
	fn isActive(&self) -> Result<bool, Error>;

	/// Seconds the service wants between two writes, as reported.
	fn getDelay(&self) -> Result<f64, Error>;

	fn getDimensions(&self) -> Result<Vec2, Error>;

	fn putPixel(&self, pixel: &PixelWrite) -> Result<(), WriteFailure>;
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct PixelWrite {
	pub x: u32,
	pub y: u32,
	pub color: PaletteColor,
}

/// How a canvas position is laid out in the `/api/pixel` payload.
#[derive(Deserialize, clap::ValueEnum, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub enum PayloadAxes {
	/// `x` carries the row and `y` the column, as the deployed pixel war service reads them.
	#[default]
	Swapped,
	Canvas,
}

impl PayloadAxes {
	pub fn pixelWrite(self, position: Vec2, color: PaletteColor) -> PixelWrite {
		let [x, y] = match self {
			Self::Swapped => [position[Y], position[X]],
			Self::Canvas => position,
		};
		PixelWrite { x, y, color }
	}
}

pub struct HttpCanvas {
	baseUrl: String,
	client: reqwest::blocking::Client,
}

impl HttpCanvas {
	pub fn new(baseUrl: &str) -> Result<Self, Error> {
		let client = reqwest::blocking::Client::builder()
			.build()
			.map_err(|err| Error::RemoteUnavailable { endpoint: baseUrl.to_owned(), reason: err.to_string() })?;
		Ok(Self::withClient(baseUrl, client))
	}

	pub fn withClient(baseUrl: &str, client: reqwest::blocking::Client) -> Self {
		Self { baseUrl: baseUrl.trim_end_matches('/').to_owned(), client }
	}

	fn url(&self, endpoint: &str) -> String {
		format!("{}{endpoint}", self.baseUrl)
	}

	fn getJson<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
		let url = self.url(endpoint);
		debug!(%url, "querying canvas");
		let unavailable = |reason: String| Error::RemoteUnavailable { endpoint: url.clone(), reason };
		let response = self.client.get(&url).send().map_err(|err| unavailable(err.to_string()))?;
		let status = response.status();
		if !status.is_success() {
			return Err(unavailable(format!("status code {}", status.as_u16())));
		}
		response.json().map_err(|err| unavailable(err.to_string()))
	}
}

impl CanvasApi for HttpCanvas {
	fn isActive(&self) -> Result<bool, Error> {
		#[derive(Deserialize)]
		struct Active {
			#[serde(default)]
			active: bool,
		}
		Ok(self.getJson::<Active>(ACTIVE_ENDPOINT)?.active)
	}

	fn getDelay(&self) -> Result<f64, Error> {
		let value = self.getJson::<Value>(DELAY_ENDPOINT)?;
		parseDelay(&value).ok_or_else(|| Error::RemoteUnavailable {
			endpoint: self.url(DELAY_ENDPOINT),
			reason: format!("unusable delay {value}"),
		})
	}

	fn getDimensions(&self) -> Result<Vec2, Error> {
		#[derive(Deserialize)]
		struct Size {
			width: u32,
			height: u32,
		}
		let Size { width, height } = self.getJson(SIZE_ENDPOINT)?;
		Ok([width, height])
	}

	fn putPixel(&self, pixel: &PixelWrite) -> Result<(), WriteFailure> {
		let response = self
			.client
			.post(self.url(PIXEL_ENDPOINT))
			.json(pixel)
			.send()
			.map_err(|err| WriteFailure::Transport(err.to_string()))?;
		match response.status() {
			status if status.is_success() => Ok(()),
			status => Err(WriteFailure::Status(status.as_u16())),
		}
	}
}

/// Accepts a bare JSON number or a numeric string; anything negative or non-finite is refused.
pub fn parseDelay(value: &Value) -> Option<f64> {
	let seconds = match value {
		Value::Number(number) => number.as_f64()?,
		Value::String(string) => string.trim().parse().ok()?,
		_ => return None,
	};
	(seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

/// What a run may rely on, fetched once before anything else happens and never refreshed.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CanvasConstraints {
	/// Reported delay plus the configured safety buffer.
	pub delay: Duration,
	pub dimensions: Vec2,
}

impl CanvasConstraints {
	/// Checks `isActive` first and stops with [`Error::Inactive`] before any other query.
	pub fn fetch<C: CanvasApi + ?Sized>(canvas: &C, delayBuffer: Duration) -> Result<Self, Error> {
		if !canvas.isActive()? {
			return Err(Error::Inactive);
		}
		let reported = canvas.getDelay()?;
		let delay = Duration::try_from_secs_f64(reported).map_err(|err| Error::RemoteUnavailable {
			endpoint: DELAY_ENDPOINT.to_owned(),
			reason: format!("unusable delay {reported}: {err}"),
		})? + delayBuffer;
		let dimensions = canvas.getDimensions()?;
		if dimensions.contains(&0) {
			return Err(Error::RemoteUnavailable {
				endpoint: SIZE_ENDPOINT.to_owned(),
				reason: format!("empty canvas {dimensions:?}"),
			});
		}
		debug!(?delay, ?dimensions, "canvas constraints");
		Ok(Self { delay, dimensions })
	}

	pub fn validateFirstPixel(&self, point: [i64; 2]) -> Result<Vec2, ValidationError> {
		geometry::validateFirstPixel(point, self.dimensions)
	}

	pub fn validateLastPixel(&self, first: Vec2, point: [i64; 2]) -> Result<TargetRectangle, ValidationError> {
		geometry::validateLastPixel(first, point, self.dimensions)
	}

	pub fn validateRectangle(&self, first: [i64; 2], last: [i64; 2]) -> Result<TargetRectangle, ValidationError> {
		geometry::validateRectangle(first, last, self.dimensions)
	}
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::palette::PALETTE,
		serde_json::json,
		std::{
			cell::Cell,
			io::{BufRead, BufReader, Read, Write},
			net::TcpListener,
			thread::{self, JoinHandle},
		},
	};

	struct FixedCanvas {
		active: bool,
		delay: f64,
		dimensions: Vec2,
		queries: Cell<usize>,
	}

	impl CanvasApi for FixedCanvas {
		fn isActive(&self) -> Result<bool, Error> {
			self.queries.set(self.queries.get() + 1);
			Ok(self.active)
		}
		fn getDelay(&self) -> Result<f64, Error> {
			self.queries.set(self.queries.get() + 1);
			Ok(self.delay)
		}
		fn getDimensions(&self) -> Result<Vec2, Error> {
			self.queries.set(self.queries.get() + 1);
			Ok(self.dimensions)
		}
		fn putPixel(&self, _: &PixelWrite) -> Result<(), WriteFailure> {
			unreachable!()
		}
	}

	#[test]
	fn delayIncludesBuffer() {
		let canvas = FixedCanvas { active: true, delay: 2.0, dimensions: [100, 50], queries: Cell::new(0) };
		let constraints = CanvasConstraints::fetch(&canvas, Duration::from_millis(100)).unwrap();
		assert_eq!(constraints.delay, Duration::from_millis(2100));
		assert_eq!(constraints.dimensions, [100, 50]);
		assert!(constraints.validateRectangle([0, 0], [99, 49]).is_ok());
		assert!(constraints.validateRectangle([0, 0], [100, 49]).is_err());
	}

	#[test]
	fn inactiveCanvasStopsAfterFirstQuery() {
		let canvas = FixedCanvas { active: false, delay: 1.0, dimensions: [10, 10], queries: Cell::new(0) };
		assert!(matches!(CanvasConstraints::fetch(&canvas, Duration::ZERO), Err(Error::Inactive)));
		assert_eq!(canvas.queries.get(), 1);
	}

	#[test]
	fn delayParsing() {
		assert_eq!(parseDelay(&json!(3)), Some(3.0));
		assert_eq!(parseDelay(&json!(0.5)), Some(0.5));
		assert_eq!(parseDelay(&json!(" 4 ")), Some(4.0));
		assert_eq!(parseDelay(&json!(-1)), None);
		assert_eq!(parseDelay(&json!({ "delay": 3 })), None);
	}

	#[test]
	fn swappedAxesPutRowInX() {
		let color = PALETTE[5];
		assert_eq!(PayloadAxes::Swapped.pixelWrite([3, 9], color), PixelWrite { x: 9, y: 3, color });
		assert_eq!(PayloadAxes::Canvas.pixelWrite([3, 9], color), PixelWrite { x: 3, y: 9, color });
		assert_eq!(
			serde_json::to_value(PixelWrite { x: 1, y: 2, color }).unwrap(),
			json!({ "x": 1, "y": 2, "color": "#E50000" })
		);
	}

	/// Answers exactly one HTTP request with `status` and `body`, handing back the raw request.
	fn serveOnce(status: &'static str, body: &'static str) -> (HttpCanvas, JoinHandle<String>) {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let baseUrl = format!("http://{}/", listener.local_addr().unwrap());
		let server = thread::spawn(move || {
			let (stream, _) = listener.accept().unwrap();
			let mut reader = BufReader::new(stream.try_clone().unwrap());
			let (mut request, mut contentLength) = (String::new(), 0);
			loop {
				let mut line = String::new();
				reader.read_line(&mut line).unwrap();
				if let Some((name, value)) = line.split_once(':') {
					if name.eq_ignore_ascii_case("content-length") {
						contentLength = value.trim().parse().unwrap();
					}
				}
				request.push_str(&line);
				if line == "\r\n" || line.is_empty() {
					break;
				}
			}
			let mut requestBody = vec![0; contentLength];
			reader.read_exact(&mut requestBody).unwrap();
			request.push_str(&String::from_utf8(requestBody).unwrap());
			let mut stream = stream;
			write!(
				stream,
				"HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
				body.len()
			)
			.unwrap();
			request
		});
		let client = reqwest::blocking::Client::builder().no_proxy().build().unwrap();
		(HttpCanvas::withClient(&baseUrl, client), server)
	}

	#[test]
	fn httpSizeQuery() {
		let (canvas, server) = serveOnce("200 OK", r#"{"width": 120, "height": 80}"#);
		assert_eq!(canvas.getDimensions().unwrap(), [120, 80]);
		assert!(server.join().unwrap().starts_with("GET /api/size HTTP/1.1\r\n"));
	}

	#[test]
	fn httpActiveDefaultsToFalse() {
		let (canvas, server) = serveOnce("200 OK", "{}");
		assert!(!canvas.isActive().unwrap());
		server.join().unwrap();
	}

	#[test]
	fn httpFailureStatusIsRemoteUnavailable() {
		let (canvas, server) = serveOnce("503 Service Unavailable", "null");
		match canvas.getDelay() {
			Err(Error::RemoteUnavailable { endpoint, reason }) => {
				assert!(endpoint.ends_with(DELAY_ENDPOINT));
				assert_eq!(reason, "status code 503");
			}
			other => panic!("{other:?}"),
		}
		server.join().unwrap();
	}

	#[test]
	fn httpPixelWrite() {
		let (canvas, server) = serveOnce("200 OK", "{}");
		canvas.putPixel(&PixelWrite { x: 4, y: 2, color: PALETTE[13] }).unwrap();
		let request = server.join().unwrap();
		assert!(request.starts_with("POST /api/pixel HTTP/1.1\r\n"));
		let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
		assert_eq!(
			serde_json::from_str::<Value>(body).unwrap(),
			json!({ "x": 4, "y": 2, "color": "#0000EA" })
		);

		let (canvas, server) = serveOnce("429 Too Many Requests", "{}");
		assert_eq!(canvas.putPixel(&PixelWrite { x: 0, y: 0, color: PALETTE[0] }), Err(WriteFailure::Status(429)));
		server.join().unwrap();
	}

	#[test]
	fn httpWriteToClosedPortIsTransportFailure() {
		let baseUrl = {
			let listener = TcpListener::bind("127.0.0.1:0").unwrap();
			format!("http://{}/", listener.local_addr().unwrap())
		};
		let client = reqwest::blocking::Client::builder().no_proxy().build().unwrap();
		let canvas = HttpCanvas::withClient(&baseUrl, client);
		let result = canvas.putPixel(&PixelWrite { x: 0, y: 0, color: PALETTE[0] });
		assert!(matches!(result, Err(WriteFailure::Transport(_))), "{result:?}");
	}
}
