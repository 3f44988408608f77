use crate::http_client;
use chrono::{DateTime, Utc};
use isahc::Request;
use rss::Channel;
use std::io;

#[derive(Debug)]
pub struct FeedReaderError {
    pub msg: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FetchedFeedItem {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub guid: Option<String>,
    pub publication_date: DateTime<Utc>,
}

#[derive(Debug, Eq, PartialEq)]
pub struct FetchedFeed {
    pub title: String,
    pub last_build_date: Option<DateTime<Utc>>,
    pub items: Vec<FetchedFeedItem>,
}

pub trait ReadFeed {
    fn read(&self) -> Result<FetchedFeed, FeedReaderError> {
        let body = read_url(&self.url())?;

        self.read_from_bytes(&body)
    }

    fn read_from_bytes(&self, data: &[u8]) -> Result<FetchedFeed, FeedReaderError>;

    fn url(&self) -> String;
}

pub struct RssReader {
    pub url: String,
}

impl ReadFeed for RssReader {
    fn read_from_bytes(&self, data: &[u8]) -> Result<FetchedFeed, FeedReaderError> {
        match Channel::read_from(data) {
            Ok(channel) => Ok(FetchedFeed::from(channel)),
            Err(err) => {
                let msg = format!("{}", err);

                Err(FeedReaderError { msg })
            }
        }
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

impl From<Channel> for FetchedFeed {
    fn from(channel: Channel) -> Self {
        let items = channel
            .items()
            .iter()
            .map(|item| FetchedFeedItem {
                title: item
                    .title()
                    .map_or_else(|| "".to_string(), |s| s.to_string()),
                description: item.description().map(|s| s.to_string()),
                author: item.author().map(|s| s.to_string()),
                guid: item.guid().map(|guid| guid.value().to_string()),
                publication_date: parse_time(item.pub_date()),
            })
            .collect::<Vec<FetchedFeedItem>>();

        FetchedFeed {
            title: channel.title().to_string(),
            last_build_date: channel
                .last_build_date()
                .and_then(|date| DateTime::parse_from_rfc2822(date).ok())
                .map(|date| date.into()),
            items,
        }
    }
}

fn parse_time(pub_date: Option<&str>) -> DateTime<Utc> {
    match pub_date {
        None => Utc::now(),
        Some(string) => match DateTime::parse_from_rfc2822(string) {
            Ok(date) => date.into(),
            Err(_) => Utc::now(),
        },
    }
}

pub fn read_url(url: &str) -> Result<Vec<u8>, FeedReaderError> {
    let client = http_client::client();

    let request = Request::get(url).body(());

    if let Err(_error) = request {
        return Err(FeedReaderError {
            msg: "Invalid URL".to_string(),
        });
    };

    match client.send(request.unwrap()) {
        Ok(mut response) => {
            let mut writer: Vec<u8> = vec![];

            if let Err(err) = io::copy(response.body_mut(), &mut writer) {
                let msg = format!("{err:?}");

                return Err(FeedReaderError { msg });
            }

            Ok(writer)
        }
        Err(error) => {
            let msg = format!("{error:?}");

            Err(FeedReaderError { msg })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchedFeed, ReadFeed, RssReader};
    use chrono::{TimeZone, Utc};
    use std::fs;

    #[test]
    fn it_parses_the_creators_feed() {
        let xml = fs::read_to_string("./tests/support/creators_feed_example.xml").unwrap();

        let reader = RssReader {
            url: "http://example.com/feed/key.rss".to_string(),
        };

        let feed: FetchedFeed = reader.read_from_bytes(xml.as_bytes()).unwrap();

        assert_eq!(feed.title, "Creators Syndicate");
        assert_eq!(
            feed.last_build_date,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap())
        );
        assert_eq!(feed.items.len(), 2);

        let first = &feed.items[0];
        assert_eq!(first.title, "Big Story by Jane Doe");
        assert_eq!(first.author.as_deref(), Some("ab12@get.creators.com (Jane Doe)"));
        assert_eq!(
            first.guid.as_deref(),
            Some("http://www.creators.com/read/ab12/12345")
        );
        assert_eq!(
            first.publication_date,
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn it_reports_a_parse_failure() {
        let reader = RssReader {
            url: "http://example.com/feed/key.rss".to_string(),
        };

        assert!(reader.read_from_bytes(b"not xml").is_err());
    }
}
