//! Upcoming events carousel.

use ocdconfig::{ComponentDescriptor, SectionSchema};

use super::Component;
use crate::config::SiteConfig;

const USAGE: &str = r#"<div>
<h4>Attributes</h4>
<ul>
<li><strong>class</strong>: Adds an additional class to the wrapper div for your custom styles. Default is <code>upcoming_events_carousel</code></li>
<li><strong>title_tag</strong>: Choose the HTML element to be used for the event titles. h1, h2, h3, h4, h5, h6, p, span, etc. Default is <code>h3</code></li>
<li><strong>limit</strong>: Number of events to pull from the database. Default is <code>7</code></li>
<li><strong>nav_arrows</strong>: Include the "prev" and "next" navigation arrows in the carousel. Default is <code>true</code></li>
</ul>
</div>"#;

/// Carousel of upcoming events. Has no settings, only instructions.
pub struct EventsCarousel;

impl Component for EventsCarousel {
    fn slug(&self) -> &str {
        "upcoming_events_carousel"
    }

    fn label(&self) -> &str {
        "Upcoming Events Carousel"
    }

    fn descriptor(&self, _site: &SiteConfig) -> ComponentDescriptor {
        ComponentDescriptor::new(self.slug(), "Events Carousel")
            .section(SectionSchema::new("usage", "Shortcode Instructions").description(USAGE))
    }
}
