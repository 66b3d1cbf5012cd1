mod fps;
mod panels;
mod search;
