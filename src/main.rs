use chrono::{Local, NaiveDateTime};
use iced::widget::{button, column, container, row, text, text_input, Column};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use std::convert::identity;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod prayer;
mod state;
mod time;
mod ui;

use api::service::MIN_CITY_QUERY_LEN;
use api::{FetchPolicy, Fetched, FreshnessCache, HttpTransport, LocationService, OfflineTransport, Transport};
use config::Config;
use state::data::{LocationResult, PrayerTimes};
use state::display::DisplayState;
use state::selection::{filter_by_name, manual_district, Selection};

/// Main application state
struct PrayerTimesApp {
    /// API access with cache and fallback
    service: LocationService,
    /// City looked up on start-up
    default_city: String,
    selection: Selection,
    /// Text in the city search box
    city_query: String,
    /// Sequence number of the latest city search; older responses are dropped
    city_search_seq: u64,
    cities: Vec<LocationResult>,
    cities_degraded: bool,
    /// Text in the district filter box
    district_query: String,
    districts: Vec<LocationResult>,
    districts_degraded: bool,
    /// Last fetched schedule for the active location
    prayer_times: Option<Fetched<PrayerTimes>>,
    is_loading: bool,
    display: DisplayState,
    now: NaiveDateTime,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User typed in the city search box
    CityQueryChanged(String),
    /// City search finished (sequence number, results)
    CitiesLoaded(u64, Fetched<Vec<LocationResult>>),
    /// Start-up search for the default city finished
    DefaultCityLoaded(Fetched<Vec<LocationResult>>),
    CitySelected(LocationResult),
    /// District list for a city finished loading
    DistrictsLoaded(String, Fetched<Vec<LocationResult>>),
    /// User typed in the district filter box
    DistrictQueryChanged(String),
    DistrictSelected(LocationResult),
    /// Prayer times for a location finished loading
    PrayerTimesLoaded(String, Fetched<PrayerTimes>),
    /// User pressed "Vakitleri Yenile"
    Refresh,
    /// User pressed "Önbelleği Temizle"
    ClearCache,
    /// One-second clock tick
    Tick,
}

impl PrayerTimesApp {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load().unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring config file, using defaults");
            Config::default()
        });
        info!(api = %config.api_base_url, "🕌 Namaz Vakitleri starting");

        let service = build_service(&config);
        let now = Local::now().naive_local();

        let app = PrayerTimesApp {
            service: service.clone(),
            default_city: config.default_city.clone(),
            selection: Selection::new(),
            city_query: String::new(),
            city_search_seq: 0,
            cities: Vec::new(),
            cities_degraded: false,
            district_query: String::new(),
            districts: Vec::new(),
            districts_degraded: false,
            prayer_times: None,
            is_loading: false,
            display: DisplayState::default(),
            now,
            status: String::from("Şehir seçin."),
        };

        // Show the default city until the user picks one
        let default_city = app.default_city.clone();
        let task = Task::perform(
            async move { service.search_city(&default_city).await },
            Message::DefaultCityLoaded,
        );

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CityQueryChanged(query) => {
                self.city_query = query;
                self.city_search_seq += 1;

                if self.city_query.trim().chars().count() < MIN_CITY_QUERY_LEN {
                    self.cities.clear();
                    self.cities_degraded = false;
                    return Task::none();
                }

                let seq = self.city_search_seq;
                let query = self.city_query.clone();
                let service = self.service.clone();
                Task::perform(
                    async move { service.search_city(&query).await },
                    move |results| Message::CitiesLoaded(seq, results),
                )
            }
            Message::CitiesLoaded(seq, results) => {
                if seq == self.city_search_seq {
                    self.cities_degraded = results.is_degraded();
                    self.cities = results.data;
                }
                Task::none()
            }
            Message::DefaultCityLoaded(results) => {
                if self.selection.city().is_some() {
                    return Task::none();
                }
                match results.data.into_iter().next() {
                    Some(city) => self.update(Message::CitySelected(city)),
                    None => {
                        warn!(city = %self.default_city, "Default city not found");
                        Task::none()
                    }
                }
            }
            Message::CitySelected(city) => {
                self.selection.select_city(&city.id, &city.text);
                self.city_search_seq += 1;
                self.city_query = city.text.clone();
                self.cities.clear();
                self.district_query.clear();
                self.districts.clear();
                self.districts_degraded = false;
                self.status = format!("Şehir değiştirildi: {} için namaz vakitleri yükleniyor.", city.text);

                Task::batch([self.load_districts(city.id), self.load_prayer_times(false)])
            }
            Message::DistrictsLoaded(city_id, results) => {
                let still_selected = self.selection.city().is_some_and(|city| city.id == city_id);
                if still_selected {
                    self.districts_degraded = results.is_degraded();
                    self.districts = results.data;
                }
                Task::none()
            }
            Message::DistrictQueryChanged(query) => {
                self.district_query = query;
                Task::none()
            }
            Message::DistrictSelected(district) => {
                if !self.selection.select_district(&district.id, &district.text) {
                    return Task::none();
                }
                self.district_query.clear();
                if let Some(name) = self.selection.display_name() {
                    self.status = format!("İlçe değiştirildi: {} için namaz vakitleri yükleniyor.", name);
                }
                self.load_prayer_times(false)
            }
            Message::PrayerTimesLoaded(location_id, fetched) => {
                if self.selection.active_location_id() != Some(location_id.as_str()) {
                    return Task::none();
                }
                if fetched.is_degraded() {
                    self.status = String::from("Namaz vakitleri alınamadı, tahmini vakitler gösteriliyor.");
                } else if let Some(name) = self.selection.display_name() {
                    self.status = format!("{} için namaz vakitleri güncel.", name);
                }
                self.prayer_times = Some(fetched);
                self.is_loading = false;
                self.refresh_display();
                if let Some(resolved) = self.display.resolved {
                    debug!(
                        location = %location_id,
                        current = ?resolved.current.map(|prayer| prayer.key()),
                        next = resolved.next.key(),
                        "Resolved prayer period"
                    );
                }
                Task::none()
            }
            Message::Refresh => {
                self.status = String::from("Vakitler güncelleniyor...");
                self.load_prayer_times(true)
            }
            Message::ClearCache => {
                let dropped = self.service.clear_cache();
                self.status = format!("Önbellek temizlendi ({} kayıt).", dropped);
                Task::none()
            }
            Message::Tick => {
                self.refresh_display();
                Task::none()
            }
        }
    }

    /// Fetch the district list for `city_id`
    fn load_districts(&self, city_id: String) -> Task<Message> {
        Task::perform(districts_loaded(self.service.clone(), city_id), identity)
    }

    /// Fetch prayer times for the active location.
    /// `bypass_cache` is used by the manual refresh.
    fn load_prayer_times(&mut self, bypass_cache: bool) -> Task<Message> {
        let Some(location_id) = self.selection.active_location_id().map(str::to_string) else {
            return Task::none();
        };

        if !bypass_cache {
            self.prayer_times = None;
        }
        self.is_loading = true;
        self.refresh_display();

        Task::perform(
            prayer_times_loaded(self.service.clone(), location_id, bypass_cache),
            identity,
        )
    }

    /// Re-run the resolver and countdown against the current time
    fn refresh_display(&mut self) {
        self.now = Local::now().naive_local();
        self.display = DisplayState::compute(self.prayer_times.as_ref(), self.is_loading, self.now);
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = column![
            text("Namaz Vakitleri").size(40),
            text("Günlük namaz vakitlerini takip edin").size(16),
        ]
        .spacing(4)
        .align_x(Alignment::Center);

        let city_column = column![
            text_input("Şehir arayın...", &self.city_query)
                .on_input(Message::CityQueryChanged)
                .padding(10),
        ]
        .push_maybe((!self.cities.is_empty()).then(|| {
            ui::picker::result_list(
                self.cities.iter().collect(),
                self.selection.city().map(|city| city.id.as_str()),
                Message::CitySelected,
            )
        }))
        .push_maybe(self.cities_degraded.then(|| text("Şehir listesi çevrimdışı listeden gösteriliyor.").size(12)))
        .spacing(8)
        .width(Length::FillPortion(1));

        let matching_districts = filter_by_name(&self.districts, &self.district_query);
        // Offer the typed name when nothing in the list fits it
        let manual = manual_district(&self.district_query)
            .filter(|_| matching_districts.is_empty() || self.districts_degraded);

        let district_column = Column::new()
            .push(text("İlçe Seçin").size(16))
            .push_maybe(self.selection.city().is_some().then(|| {
                column![
                    text_input("İlçe arayın...", &self.district_query)
                        .on_input(Message::DistrictQueryChanged)
                        .padding(10),
                    ui::picker::result_list(
                        matching_districts,
                        self.selection.district().map(|district| district.id.as_str()),
                        Message::DistrictSelected,
                    ),
                ]
                .push_maybe(manual.map(ui::picker::save_as_button))
                .spacing(8)
            }))
            .push_maybe(self.districts_degraded.then(|| {
                text("İlçe verisi alınamadı. Örnek ilçelerden seçebilir veya ilçe adını yazabilirsiniz.").size(12)
            }))
            .spacing(8)
            .width(Length::FillPortion(1));

        let location = self.selection.display_name().unwrap_or_else(|| String::from("Şehir"));
        let hijri = self
            .display
            .schedule
            .as_ref()
            .map(|schedule| schedule.date.hijri.clone())
            .unwrap_or_default();

        let date_line = row![
            text(location).size(20),
            text(time::turkish_long_date(self.now.date())).size(16),
            text(hijri).size(16),
            text(self.now.format("%H:%M:%S").to_string()).size(20),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let refresh = button(text("Vakitleri Yenile"))
            .on_press_maybe(self.selection.active_location_id().map(|_| Message::Refresh))
            .padding(10);
        let clear_cache = button(text("Önbelleği Temizle"))
            .on_press(Message::ClearCache)
            .style(button::secondary)
            .padding(10);

        let body: Element<Message> = if self.display.is_loading && self.display.schedule.is_none() {
            text("Namaz vakitleri yükleniyor...").into()
        } else {
            ui::cards::prayer_grid(&self.display)
        };

        let content = column![
            header,
            row![city_column, district_column].spacing(20),
            row![refresh, clear_cache].spacing(12),
            date_line,
            body,
            ui::cards::countdown_banner(&self.display),
            text(&self.status).size(14),
            text("Veriler abdus.dev Prayer Times API aracılığıyla sağlanmaktadır.").size(12),
        ]
        .spacing(20)
        .padding(40)
        .max_width(900.0)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// The one-second display tick; no I/O happens on it
    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(Duration::from_secs(1)).map(|_| Message::Tick)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// District search for `city_id`, tagged with the city it was made for
async fn districts_loaded(service: LocationService, city_id: String) -> Message {
    let results = service.search_district(&city_id).await;
    Message::DistrictsLoaded(city_id, results)
}

/// Prayer times for `location_id`, tagged with the location they belong to
async fn prayer_times_loaded(service: LocationService, location_id: String, bypass_cache: bool) -> Message {
    let fetched = if bypass_cache {
        service.fetch_prayer_times_fresh(&location_id).await
    } else {
        service.fetch_prayer_times(&location_id).await
    };
    Message::PrayerTimesLoaded(location_id, fetched)
}

/// Wire the HTTP transport, cache and retry policy together.
/// Without a usable HTTP client the app still runs on fallback data.
fn build_service(config: &Config) -> LocationService {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let transport: Arc<dyn Transport> = match HttpTransport::new(&config.api_base_url, timeout) {
        Ok(http) => Arc::new(http),
        Err(err) => {
            warn!(error = %err, "HTTP client unavailable, running offline");
            Arc::new(OfflineTransport::new(err.to_string()))
        }
    };

    LocationService::new(transport, Arc::new(FreshnessCache::new()), FetchPolicy::from(config))
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application(
        "Namaz Vakitleri",
        PrayerTimesApp::update,
        PrayerTimesApp::view,
    )
    .subscription(PrayerTimesApp::subscription)
    .theme(PrayerTimesApp::theme)
    .centered()
    .run_with(PrayerTimesApp::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::client::mock::ScriptedTransport;
    use api::client::ApiRequest;
    use api::fallback::slugify;

    const TIMES_JSON: &str = r#"{
        "id": "9206",
        "name": "ÇANKAYA",
        "date": { "hijri": "1 Ramazan 1445", "gregorian": "2024-03-11" },
        "times": {
            "imsak": "05:41", "gunes": "07:05", "ogle": "13:17",
            "ikindi": "16:38", "aksam": "19:18", "yatsi": "20:36"
        }
    }"#;

    fn service(transport: Arc<ScriptedTransport>) -> LocationService {
        let policy = FetchPolicy {
            retry_delay: Duration::ZERO,
            ..FetchPolicy::default()
        };
        LocationService::new(transport, Arc::new(FreshnessCache::new()), policy)
    }

    fn app(service: LocationService) -> PrayerTimesApp {
        PrayerTimesApp {
            service,
            default_city: String::from("Ankara"),
            selection: Selection::new(),
            city_query: String::new(),
            city_search_seq: 0,
            cities: Vec::new(),
            cities_degraded: false,
            district_query: String::new(),
            districts: Vec::new(),
            districts_degraded: false,
            prayer_times: None,
            is_loading: false,
            display: DisplayState::default(),
            now: Local::now().naive_local(),
            status: String::new(),
        }
    }

    fn location(id: &str, text: &str) -> LocationResult {
        LocationResult {
            id: id.to_string(),
            text: text.to_string(),
            slug: slugify(text),
        }
    }

    #[tokio::test]
    async fn test_district_results_are_tagged_with_city() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(r#"[{ "id": "9206", "text": "Çankaya", "slug": "cankaya" }]"#);

        let message = districts_loaded(service(transport.clone()), String::from("539")).await;

        let Message::DistrictsLoaded(city_id, results) = message else {
            panic!("unexpected message: {:?}", message);
        };
        assert_eq!(city_id, "539");
        assert_eq!(results.data[0].text, "Çankaya");
        assert_eq!(transport.requests(), vec![ApiRequest::Districts("539".to_string())]);
    }

    #[tokio::test]
    async fn test_refresh_result_is_tagged_and_skips_cache() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(TIMES_JSON);
        transport.push_ok(TIMES_JSON);
        let service = service(transport.clone());

        prayer_times_loaded(service.clone(), String::from("9206"), false).await;
        let message = prayer_times_loaded(service, String::from("9206"), true).await;

        let Message::PrayerTimesLoaded(location_id, fetched) = message else {
            panic!("unexpected message: {:?}", message);
        };
        assert_eq!(location_id, "9206");
        assert!(!fetched.is_degraded());
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_districts_for_previous_city_are_dropped() {
        let mut app = app(service(Arc::new(ScriptedTransport::new())));
        let _ = app.update(Message::CitySelected(location("552", "İzmir")));

        let stale = Fetched {
            data: vec![location("9206", "Çankaya")],
            source: api::service::DataSource::Live,
        };
        let _ = app.update(Message::DistrictsLoaded(String::from("539"), stale));

        assert!(app.districts.is_empty());
    }

    #[test]
    fn test_typed_district_can_be_saved_by_name() {
        let mut app = app(service(Arc::new(ScriptedTransport::new())));
        let _ = app.update(Message::CitySelected(location("539", "Ankara")));
        app.districts = vec![location("9206", "Çankaya"), location("9220", "Sincan")];

        let _ = app.update(Message::DistrictQueryChanged(String::from("çan")));
        assert_eq!(filter_by_name(&app.districts, &app.district_query).len(), 1);

        let _ = app.update(Message::DistrictQueryChanged(String::from("Gölbaşı")));
        assert!(filter_by_name(&app.districts, &app.district_query).is_empty());

        let typed = manual_district(&app.district_query).unwrap();
        let _ = app.update(Message::DistrictSelected(typed));

        assert_eq!(app.selection.active_location_id(), Some("Gölbaşı"));
        assert_eq!(app.selection.display_name().as_deref(), Some("Ankara, Gölbaşı"));
        assert!(app.district_query.is_empty());
        assert!(app.is_loading);
    }

    #[test]
    fn test_new_city_resets_district_filter() {
        let mut app = app(service(Arc::new(ScriptedTransport::new())));
        let _ = app.update(Message::CitySelected(location("539", "Ankara")));
        let _ = app.update(Message::DistrictQueryChanged(String::from("çan")));

        let _ = app.update(Message::CitySelected(location("552", "İzmir")));

        assert!(app.district_query.is_empty());
        assert_eq!(app.selection.active_location_id(), Some("552"));
    }
}
